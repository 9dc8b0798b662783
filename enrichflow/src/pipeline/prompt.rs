//! Query and prompt construction.
//!
//! Everything here is deterministic: the same context always yields the same
//! query and the same prompt.

use std::fmt::Write;

use crate::context::EnrichmentContext;
use crate::core::INFORMATION_NOT_FOUND;
use crate::providers::SearchResponse;

/// Builds the search query for a row.
#[must_use]
pub fn build_query(column_name: &str, target_value: &str) -> String {
    format!("{column_name} of {target_value}?")
}

/// Concatenates every result snippet into one evidence block.
#[must_use]
pub fn join_evidence(response: &SearchResponse, separator: &str) -> String {
    response.contents().collect::<Vec<_>>().join(separator)
}

/// Builds the extraction prompt.
///
/// Known context values are listed only when `include_context` is set.
#[must_use]
pub fn build_extraction_prompt(
    ctx: &EnrichmentContext,
    evidence: &str,
    include_context: bool,
) -> String {
    let mut prompt = format!(
        "Extract the {} of {} from this search result:\n\n{evidence}\n\n",
        ctx.column_name, ctx.target_value
    );

    if include_context && !ctx.context_values.is_empty() {
        let _ = writeln!(prompt, "Known facts about {}:", ctx.target_value);
        for (key, value) in ctx.sorted_context_values() {
            let _ = writeln!(prompt, "- {key}: {value}");
        }
        prompt.push('\n');
    }

    let _ = write!(
        prompt,
        "Rules:\n\
         1. Provide ONLY the direct answer - no explanations\n\
         2. Be concise\n\
         3. If information is not found, respond \"{INFORMATION_NOT_FOUND}\"\n\
         4. Do not provide citations or references\n\
         Direct Answer:"
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::SearchHit;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn ctx(values: &[(&str, &str)]) -> EnrichmentContext {
        let map: HashMap<String, String> = values
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnrichmentContext::new("CEO", "Amazon", Arc::new(map))
    }

    #[test]
    fn test_build_query() {
        assert_eq!(build_query("CEO", "Amazon"), "CEO of Amazon?");
        assert_eq!(build_query("Headquarters", "Tesla, Inc."), "Headquarters of Tesla, Inc.?");
    }

    #[test]
    fn test_join_evidence() {
        let response = SearchResponse::new(
            "q",
            vec![
                SearchHit::new("a", "https://a.example", "Andy Jassy is CEO."),
                SearchHit::new("b", "https://b.example", "Jassy succeeded Bezos."),
            ],
        );

        assert_eq!(
            join_evidence(&response, "\n\n---\n\n"),
            "Andy Jassy is CEO.\n\n---\n\nJassy succeeded Bezos."
        );
        assert_eq!(join_evidence(&SearchResponse::default(), "|"), "");
    }

    #[test]
    fn test_extraction_prompt_layout() {
        let prompt = build_extraction_prompt(&ctx(&[]), "EVIDENCE", false);

        assert_eq!(
            prompt,
            "Extract the CEO of Amazon from this search result:\n\n\
             EVIDENCE\n\n\
             Rules:\n\
             1. Provide ONLY the direct answer - no explanations\n\
             2. Be concise\n\
             3. If information is not found, respond \"Information not found\"\n\
             4. Do not provide citations or references\n\
             Direct Answer:"
        );
    }

    #[test]
    fn test_extraction_prompt_is_deterministic() {
        let c = ctx(&[("Location", "Seattle, WA"), ("Founded", "1994")]);

        assert_eq!(
            build_extraction_prompt(&c, "E", true),
            build_extraction_prompt(&c, "E", true)
        );
    }

    #[test]
    fn test_extraction_prompt_with_context() {
        let c = ctx(&[("Location", "Seattle, WA"), ("Founded", "1994")]);
        let prompt = build_extraction_prompt(&c, "E", true);

        assert!(prompt.contains("Known facts about Amazon:\n- Founded: 1994\n- Location: Seattle, WA\n"));
        assert!(!build_extraction_prompt(&c, "E", false).contains("Known facts"));
    }
}
