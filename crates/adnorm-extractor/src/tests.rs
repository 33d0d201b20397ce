//! End-to-end tests for extraction and reconciliation

#[cfg(test)]
mod tests {
    use crate::{reconcile, DuplicatePolicy, Extractor, ExtractorConfig, ExtractorError};
    use adnorm_domain::{CampaignRecord, Dataset};
    use adnorm_llm::{LlmError, MockProvider};
    use serde_json::json;

    fn dataset(names: &[String]) -> Dataset {
        let records = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                CampaignRecord::from_pairs(
                    i,
                    [
                        ("date", json!("2024-01-01")),
                        ("campaign_name", json!(name)),
                        ("spend", json!("10.00")),
                    ],
                )
                .unwrap()
            })
            .collect();
        Dataset::new(
            vec!["date".into(), "campaign_name".into(), "spend".into()],
            records,
        )
        .unwrap()
    }

    fn config() -> ExtractorConfig {
        ExtractorConfig {
            retry_base_delay_ms: 1,
            ..Default::default()
        }
    }

    fn response_for(names: &[String]) -> String {
        let items: Vec<_> = names
            .iter()
            .map(|n| {
                json!({
                    "campaign_name": n,
                    "source": "google",
                    "objective": "brand",
                    "geo": "US",
                    "audience": null
                })
            })
            .collect();
        serde_json::to_string(&items).unwrap()
    }

    #[tokio::test]
    async fn test_two_facebook_campaigns() {
        let names = vec![
            "fb_prospecting_us".to_string(),
            "Facebook - Retargeting".to_string(),
        ];
        let llm = MockProvider::new(
            r#"```json
[
  {"campaign_name": "fb_prospecting_us", "source": "facebook", "objective": "prospecting", "geo": "US", "audience": "cold"},
  {"campaign_name": "Facebook - Retargeting", "source": "facebook", "objective": "retargeting", "geo": null, "audience": "warm"}
]
```"#,
        );
        let extractor = Extractor::new(llm.clone(), config()).unwrap();

        let outcome = extractor.extract(&names).await.unwrap();
        assert_eq!(llm.call_count(), 1);
        assert_eq!(outcome.metadata.batches, 1);
        assert_eq!(outcome.metadata.records_parsed, 2);

        let joined = reconcile(dataset(&names), &outcome.fields, DuplicatePolicy::default()).unwrap();
        assert_eq!(joined.records.len(), 2);
        assert!(joined
            .records
            .iter()
            .all(|r| r.source.as_deref() == Some("facebook")));
        assert_eq!(joined.records[0].geo.as_deref(), Some("US"));
        assert!(joined.records[1].geo.is_none());
        assert_eq!(joined.records[1].audience.as_deref(), Some("warm"));
    }

    #[tokio::test]
    async fn test_invalid_response_yields_null_records() {
        let names = vec!["a".to_string(), "b".to_string()];
        let llm = MockProvider::new("I could not parse these campaigns.");
        let extractor = Extractor::new(llm, config()).unwrap();

        let outcome = extractor.extract(&names).await.unwrap();
        assert_eq!(outcome.fields.len(), 2);
        assert!(outcome.fields.iter().all(|f| f.is_empty()));
        assert_eq!(outcome.metadata.fallback_batches, 1);
        assert_eq!(outcome.metadata.records_fallback, 2);

        let joined = reconcile(dataset(&names), &outcome.fields, DuplicatePolicy::default()).unwrap();
        assert_eq!(joined.records.len(), 2);
        assert!(joined.records.iter().all(|r| !r.has_fields()));
        assert_eq!(joined.records[0].record.get("spend"), Some(&json!("10.00")));
    }

    #[tokio::test]
    async fn test_250_names_in_three_batches() {
        let names: Vec<String> = (0..250).map(|i| format!("campaign_{:03}", i)).collect();
        let llm = MockProvider::default();
        for batch in names.chunks(100) {
            llm.push_response(response_for(batch));
        }
        let extractor = Extractor::new(llm.clone(), config()).unwrap();

        let outcome = extractor.extract(&names).await.unwrap();

        assert_eq!(llm.call_count(), 3);
        let prompt_sizes: Vec<usize> = llm
            .requests()
            .iter()
            .map(|r| r.prompt.lines().filter(|l| l.starts_with("- campaign_")).count())
            .collect();
        assert_eq!(prompt_sizes, vec![100, 100, 50]);
        assert_eq!(outcome.fields.len(), 250);

        let joined = reconcile(dataset(&names), &outcome.fields, DuplicatePolicy::default()).unwrap();
        assert_eq!(joined.records.len(), 250);
        assert_eq!(joined.report.matched, 250);
        assert_eq!(joined.records[249].campaign_name(), "campaign_249");
    }

    #[tokio::test]
    async fn test_one_bad_batch_does_not_spoil_others() {
        let names: Vec<String> = (0..5).map(|i| format!("n{}", i)).collect();
        let llm = MockProvider::default();
        llm.push_response(response_for(&names[..2]));
        llm.push_response("oops");
        llm.push_response(response_for(&names[4..]));
        let extractor = Extractor::new(
            llm,
            ExtractorConfig {
                batch_size: 2,
                ..config()
            },
        )
        .unwrap();

        let outcome = extractor.extract(&names).await.unwrap();
        assert_eq!(outcome.metadata.batches, 3);
        assert_eq!(outcome.metadata.fallback_batches, 1);

        let joined = reconcile(dataset(&names), &outcome.fields, DuplicatePolicy::default()).unwrap();
        let filled: Vec<bool> = joined.records.iter().map(|r| r.has_fields()).collect();
        assert_eq!(filled, vec![true, true, false, false, true]);
    }

    #[tokio::test]
    async fn test_transport_retry_then_success() {
        let names = vec!["a".to_string()];
        let llm = MockProvider::new(response_for(&names));
        llm.push_error(LlmError::Communication("503".into()));
        let extractor = Extractor::new(llm.clone(), config()).unwrap();

        let outcome = extractor.extract(&names).await.unwrap();
        assert_eq!(llm.call_count(), 2);
        assert_eq!(outcome.fields[0].source.as_deref(), Some("google"));
    }

    #[tokio::test]
    async fn test_non_transient_failure_aborts_run() {
        let names: Vec<String> = (0..3).map(|i| format!("n{}", i)).collect();
        let llm = MockProvider::default();
        llm.push_response(response_for(&names[..1]));
        llm.push_error(LlmError::Authentication("invalid x-api-key".into()));
        let extractor = Extractor::new(
            llm.clone(),
            ExtractorConfig {
                batch_size: 1,
                ..config()
            },
        )
        .unwrap();

        let result = extractor.extract(&names).await;
        match result {
            Err(ExtractorError::Llm(msg)) => assert!(msg.contains("invalid x-api-key")),
            other => panic!("expected Llm error, got {:?}", other.map(|o| o.fields)),
        }
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn test_rules_route_by_prompt_content() {
        let names = vec!["tt_awareness_de".to_string()];
        let mut llm = MockProvider::default();
        llm.add_response(
            "tt_awareness_de",
            r#"[{"campaign_name": "tt_awareness_de", "source": "tiktok", "objective": "awareness", "geo": "DE", "audience": null}]"#,
        );
        let extractor = Extractor::new(llm, config()).unwrap();

        let outcome = extractor.extract(&names).await.unwrap();
        assert_eq!(outcome.fields[0].geo.as_deref(), Some("DE"));
    }
}
