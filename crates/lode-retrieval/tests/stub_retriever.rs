use std::sync::Mutex;

use async_trait::async_trait;
use lode_config::RetrievalConfig;
use lode_core::fixtures::{sample_request, valid_facts, valid_facts_json};
use lode_retrieval::{
    EscalationPolicy, RetrievalRequest, RetrievalResponse, Retriever, TransportError,
    build_request, parse_facts,
};

/// Wraps the fixture payload in prose and records what it was asked.
#[derive(Default)]
struct ChattyRetriever {
    seen: Mutex<Vec<EscalationPolicy>>,
}

#[async_trait]
impl Retriever for ChattyRetriever {
    async fn retrieve(
        &self,
        request: &RetrievalRequest,
    ) -> Result<RetrievalResponse, TransportError> {
        self.seen.lock().unwrap().push(request.config.policy);
        Ok(RetrievalResponse {
            body: format!(
                "Based on current sources:\n```json\n{}\n```",
                valid_facts_json()
            ),
            usage: None,
        })
    }
}

#[tokio::test]
async fn prose_wrapped_answer_parses_to_fixture_facts() {
    let retriever = ChattyRetriever::default();
    let config = EscalationPolicy::Baseline.configure(&RetrievalConfig::default(), &[]);
    let request = build_request(&sample_request(), config);

    let response = retriever.retrieve(&request).await.unwrap();
    let facts = parse_facts(&response.body).unwrap();

    assert_eq!(facts, valid_facts());
    assert_eq!(*retriever.seen.lock().unwrap(), vec![EscalationPolicy::Baseline]);
}
