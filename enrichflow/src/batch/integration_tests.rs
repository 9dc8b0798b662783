//! End-to-end batch scenarios over stub providers.

#[cfg(test)]
mod tests {
    use crate::batch::BatchOrchestrator;
    use crate::config::EnrichmentConfig;
    use crate::core::{BatchStatus, RowStatus, ENRICHMENT_ERROR, INFORMATION_NOT_FOUND};
    use crate::pipeline::EnrichmentPipeline;
    use crate::providers::SearchHit;
    use crate::testing::{StubLanguageModel, StubSearchProvider};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    fn orchestrator(search: &StubSearchProvider, llm: &StubLanguageModel) -> BatchOrchestrator {
        BatchOrchestrator::new(EnrichmentPipeline::new(
            Arc::new(search.clone()),
            Arc::new(llm.clone()),
        ))
    }

    fn no_context() -> Arc<HashMap<String, String>> {
        Arc::new(HashMap::new())
    }

    #[tokio::test]
    async fn test_mixed_rows_with_blank_in_the_middle() {
        let search = StubSearchProvider::new()
            .with_hits(
                "Amazon",
                vec![
                    SearchHit::new("Andy Jassy", "https://a.example/1", "Andy Jassy is CEO."),
                    SearchHit::new("Amazon leadership", "https://a.example/2", "Jassy leads."),
                    SearchHit::new("About Amazon", "https://a.example/3", "Seattle."),
                ],
            )
            .with_default_hits(5);
        let llm = StubLanguageModel::new()
            .with_answer_for("Amazon", "Andy Jassy")
            .with_answer_for("Tesla", "Elon Musk");

        let result = orchestrator(&search, &llm)
            .run_batch("CEO", &["Amazon", "", "Tesla"], no_context())
            .await
            .unwrap();
        let response = result.into_response();

        assert_eq!(response.status, BatchStatus::Success);
        assert_eq!(response.enriched_values, vec!["Andy Jassy", "", "Elon Musk"]);
        assert_eq!(response.sources.len(), 3);
        assert_eq!(response.sources[0].len(), 3);
        assert!(response.sources[1].is_empty());
        assert_eq!(response.sources[2].len(), 5);
        assert_eq!(response.sources[0][0].title, "Andy Jassy");
        assert_eq!(search.call_count(), 2);
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_search_outage_fails_rows_not_batch() {
        let search = StubSearchProvider::new().always_failing();
        let llm = StubLanguageModel::new();

        let result = orchestrator(&search, &llm)
            .run_batch("CEO", &["Amazon", " ", "Tesla"], no_context())
            .await
            .unwrap();
        assert_eq!(result.failed(), 2);
        assert_eq!(result.blank(), 1);

        let response = result.into_response();
        assert_eq!(response.status, BatchStatus::Success);
        assert_eq!(response.error, None);
        assert_eq!(
            response.enriched_values,
            vec![ENRICHMENT_ERROR, "", ENRICHMENT_ERROR]
        );
        assert!(response.sources.iter().all(Vec::is_empty));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_one_failing_row_is_isolated() {
        let search = StubSearchProvider::new().failing_for("Tesla");
        let llm = StubLanguageModel::new().with_answer("Someone");

        let result = orchestrator(&search, &llm)
            .run_batch("CEO", &["Amazon", "Tesla", "Apple"], no_context())
            .await
            .unwrap();

        assert_eq!(result.values(), vec!["Someone", ENRICHMENT_ERROR, "Someone"]);
        assert_eq!(result.rows[1].outcome.sources().len(), 0);
        assert_eq!(result.rows[0].outcome.sources().len(), 2);
        assert_eq!(result.rows[2].outcome.sources().len(), 2);
    }

    #[tokio::test]
    async fn test_language_model_failure_keeps_sources() {
        let search = StubSearchProvider::new();
        let llm = StubLanguageModel::new().failing_for("Tesla");

        let result = orchestrator(&search, &llm)
            .run_batch("CEO", &["Amazon", "Tesla"], no_context())
            .await
            .unwrap();

        assert_eq!(result.rows[1].status, RowStatus::Degraded);
        assert_eq!(result.rows[1].outcome.value(), INFORMATION_NOT_FOUND);
        assert_eq!(result.rows[1].outcome.sources().len(), 2);
        assert_eq!(result.rows[0].status, RowStatus::Success);
        assert_eq!(result.degraded(), 1);
    }

    #[tokio::test]
    async fn test_order_survives_reversed_completion() {
        let search = StubSearchProvider::new()
            .with_latency("first", Duration::from_millis(80))
            .with_latency("second", Duration::from_millis(40));
        let llm = StubLanguageModel::new()
            .with_answer_for("first", "1")
            .with_answer_for("second", "2")
            .with_answer_for("third", "3");

        let result = orchestrator(&search, &llm)
            .run_batch("Rank", &["first", "", "second", "third"], no_context())
            .await
            .unwrap();

        assert_eq!(result.values(), vec!["1", "", "2", "3"]);
        let queries = search.queries();
        assert_eq!(queries.len(), 3);
    }

    #[tokio::test]
    async fn test_rows_run_concurrently() {
        let search = StubSearchProvider::new()
            .with_latency("a", Duration::from_millis(150))
            .with_latency("b", Duration::from_millis(150))
            .with_latency("c", Duration::from_millis(150));
        let llm = StubLanguageModel::new();

        let result = orchestrator(&search, &llm)
            .run_batch("CEO", &["a", "b", "c"], no_context())
            .await
            .unwrap();

        assert_eq!(result.succeeded(), 3);
        assert!(result.timings.enrich_ms < 400.0);
    }

    #[tokio::test]
    async fn test_all_blank_rows_make_no_calls() {
        let search = StubSearchProvider::new();
        let llm = StubLanguageModel::new();

        let result = orchestrator(&search, &llm)
            .run_batch("CEO", &["", "  ", "\t"], no_context())
            .await
            .unwrap();
        let response = result.into_response();

        assert_eq!(response.enriched_values, vec!["", "", ""]);
        assert!(response.sources.iter().all(Vec::is_empty));
        assert_eq!(search.call_count(), 0);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_panicking_row_is_isolated() {
        let search = StubSearchProvider::new().panicking_for("Tesla");
        let llm = StubLanguageModel::new().with_answer("ok");

        let result = orchestrator(&search, &llm)
            .run_batch("CEO", &["Amazon", "Tesla", "Apple"], no_context())
            .await
            .unwrap();

        assert_eq!(result.values(), vec!["ok", ENRICHMENT_ERROR, "ok"]);
        assert_eq!(result.rows[1].status, RowStatus::Error);
    }

    #[tokio::test]
    async fn test_row_timeout_fails_only_slow_row() {
        let search = StubSearchProvider::new().with_latency("slow", Duration::from_secs(5));
        let llm = StubLanguageModel::new().with_answer("fast answer");
        let pipeline = EnrichmentPipeline::new(Arc::new(search), Arc::new(llm))
            .with_config(EnrichmentConfig::new().with_row_timeout(0.1));

        let result = BatchOrchestrator::new(pipeline)
            .run_batch("CEO", &["fast", "slow"], no_context())
            .await
            .unwrap();

        assert_eq!(result.values(), vec!["fast answer", ENRICHMENT_ERROR]);
        assert_eq!(result.failed(), 1);
    }

    #[tokio::test]
    async fn test_context_values_reach_prompt_when_enabled() {
        let search = StubSearchProvider::new();
        let llm = StubLanguageModel::new();
        let pipeline = EnrichmentPipeline::new(Arc::new(search), Arc::new(llm.clone()))
            .with_config(EnrichmentConfig::new().with_context_in_prompt(true));
        let context = Arc::new(HashMap::from([(
            "Industry".to_string(),
            "Retail".to_string(),
        )]));

        BatchOrchestrator::new(pipeline)
            .run_batch("CEO", &["Amazon", "Walmart"], context)
            .await
            .unwrap();

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts.iter().all(|p| p.contains("- Industry: Retail")));
    }
}
