//! Documents and everything derived from them

use super::{local_timestamp, Counter, Step};
use crate::db::{Entity, SqlValue};
use crate::document::{
    compute_trace, sanitize_text, validate_description, DocumentDraft, DocumentValidator,
};
use crate::error::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A validated source document
///
/// Build one through [`DocumentValidator::validate`] or [`WeLearnDocument::new`];
/// both guarantee an https URL, sanitized content and a matching trace.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct WeLearnDocument {
    pub id: Uuid,
    pub url: String,
    pub title: Option<String>,
    pub lang: Option<String>,
    pub description: Option<String>,
    pub full_content: Option<String>,
    pub details: Option<Json<serde_json::Value>>,
    /// Adler-32 of `full_content`
    pub trace: Option<i64>,
    pub corpus_id: Uuid,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl WeLearnDocument {
    /// Validate a draft with the default rules
    pub fn new(draft: DocumentDraft) -> Result<Self> {
        DocumentValidator::default().validate(draft)
    }

    pub fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref().map(|d| &d.0)
    }

    /// Replace the content, re-running validation and recomputing the trace
    pub fn set_full_content(&mut self, raw: &str, validator: &DocumentValidator) -> Result<()> {
        let content = validator.validate_full_content(Some(raw))?;
        self.trace = compute_trace(Some(&content));
        self.full_content = Some(content);
        Ok(())
    }

    pub fn set_description(&mut self, raw: &str) -> Result<()> {
        self.description = Some(validate_description(Some(raw))?);
        Ok(())
    }

    /// Whether `raw` would produce a different trace than the stored content
    pub fn content_changed(&self, raw: &str) -> bool {
        compute_trace(Some(&sanitize_text(raw))) != self.trace
    }
}

impl Entity for WeLearnDocument {
    const ENTITY: &'static str = "WeLearnDocument";
    const TABLE: &'static str = "welearn_document";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "url",
        "title",
        "lang",
        "description",
        "full_content",
        "details",
        "trace",
        "corpus_id",
        "created_at",
        "updated_at",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("url", self.url.clone().into()),
            ("title", self.title.clone().into()),
            ("lang", self.lang.clone().into()),
            ("description", self.description.clone().into()),
            ("full_content", self.full_content.clone().into()),
            ("details", self.details.clone().into()),
            ("trace", self.trace.into()),
            ("corpus_id", self.corpus_id.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }

    fn validate(&self, rules: &DocumentValidator) -> Result<()> {
        rules.check(self)
    }
}

/// One pipeline step reached by a document
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProcessState {
    pub id: Uuid,
    pub document_id: Uuid,
    /// Step name, see [`Step`]
    pub title: String,
    pub created_at: NaiveDateTime,
    /// Assigned by the database on insert when left empty
    pub operation_order: Option<i64>,
}

impl ProcessState {
    pub fn new(document_id: Uuid, step: Step) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            title: step.to_string(),
            created_at: local_timestamp(),
            operation_order: None,
        }
    }

    pub fn step(&self) -> Result<Step> {
        self.title.parse()
    }
}

impl Entity for ProcessState {
    const ENTITY: &'static str = "ProcessState";
    const TABLE: &'static str = "process_state";
    const COLUMNS: &'static [&'static str] =
        &["id", "document_id", "title", "created_at", "operation_order"];
    const GENERATED: &'static [&'static str] = &["operation_order"];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("document_id", self.document_id.into()),
            ("title", self.title.clone().into()),
            ("created_at", self.created_at.into()),
            ("operation_order", self.operation_order.into()),
        ]
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Keyword {
    pub id: Uuid,
    pub keyword: String,
    pub created_at: NaiveDateTime,
}

impl Keyword {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            keyword: keyword.into(),
            created_at: local_timestamp(),
        }
    }
}

impl Entity for Keyword {
    const ENTITY: &'static str = "Keyword";
    const TABLE: &'static str = "keyword";
    const COLUMNS: &'static [&'static str] = &["id", "keyword", "created_at"];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("keyword", self.keyword.clone().into()),
            ("created_at", self.created_at.into()),
        ]
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct WeLearnDocumentKeyword {
    pub id: Uuid,
    pub welearn_document_id: Uuid,
    pub keyword_id: Uuid,
}

impl WeLearnDocumentKeyword {
    pub fn new(welearn_document_id: Uuid, keyword_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            welearn_document_id,
            keyword_id,
        }
    }
}

impl Entity for WeLearnDocumentKeyword {
    const ENTITY: &'static str = "WeLearnDocumentKeyword";
    const TABLE: &'static str = "welearn_document_keyword";
    const COLUMNS: &'static [&'static str] = &["id", "welearn_document_id", "keyword_id"];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("welearn_document_id", self.welearn_document_id.into()),
            ("keyword_id", self.keyword_id.into()),
        ]
    }
}

/// A failed retrieval attempt for a document
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ErrorRetrieval {
    pub id: Uuid,
    pub document_id: Uuid,
    pub http_error_code: Option<i64>,
    pub error_info: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ErrorRetrieval {
    pub fn new(
        document_id: Uuid,
        http_error_code: Option<i64>,
        error_info: impl Into<String>,
    ) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            document_id,
            http_error_code,
            error_info: error_info.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for ErrorRetrieval {
    const ENTITY: &'static str = "ErrorRetrieval";
    const TABLE: &'static str = "error_retrieval";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "document_id",
        "http_error_code",
        "error_info",
        "created_at",
        "updated_at",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("document_id", self.document_id.into()),
            ("http_error_code", self.http_error_code.into()),
            ("error_info", self.error_info.clone().into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

/// A chunk of a document with its embedding
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DocumentSlice {
    pub id: Uuid,
    pub document_id: Uuid,
    pub embedding: Option<Vec<u8>>,
    pub body: Option<String>,
    pub order_sequence: i64,
    pub embedding_model_name: String,
    pub embedding_model_id: Uuid,
}

impl DocumentSlice {
    pub fn new(
        document_id: Uuid,
        order_sequence: i64,
        body: impl Into<String>,
        embedding_model_id: Uuid,
        embedding_model_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            embedding: None,
            body: Some(body.into()),
            order_sequence,
            embedding_model_name: embedding_model_name.into(),
            embedding_model_id,
        }
    }
}

impl Entity for DocumentSlice {
    const ENTITY: &'static str = "DocumentSlice";
    const TABLE: &'static str = "document_slice";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "document_id",
        "embedding",
        "body",
        "order_sequence",
        "embedding_model_name",
        "embedding_model_id",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("document_id", self.document_id.into()),
            ("embedding", self.embedding.clone().into()),
            ("body", self.body.clone().into()),
            ("order_sequence", self.order_sequence.into()),
            ("embedding_model_name", self.embedding_model_name.clone().into()),
            ("embedding_model_id", self.embedding_model_id.into()),
        ]
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AnalyticCounter {
    pub id: Uuid,
    pub document_id: Uuid,
    /// Counter name, see [`Counter`]
    pub counter_name: String,
    pub counter_value: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AnalyticCounter {
    pub fn new(document_id: Uuid, counter: Counter) -> Self {
        let now = local_timestamp();
        Self {
            id: Uuid::new_v4(),
            document_id,
            counter_name: counter.to_string(),
            counter_value: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn counter(&self) -> Result<Counter> {
        self.counter_name.parse()
    }

    pub fn increment(&mut self) {
        self.counter_value += 1;
    }
}

impl Entity for AnalyticCounter {
    const ENTITY: &'static str = "AnalyticCounter";
    const TABLE: &'static str = "analytic_counter";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "document_id",
        "counter_name",
        "counter_value",
        "created_at",
        "updated_at",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("document_id", self.document_id.into()),
            ("counter_name", self.counter_name.clone().into()),
            ("counter_value", self.counter_value.into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

/// SDG label attached to a slice by one of the classifiers
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Sdg {
    pub id: Uuid,
    pub slice_id: Uuid,
    /// 1 to 17
    pub sdg_number: i64,
    pub created_at: NaiveDateTime,
    pub bi_classifier_model_id: Option<Uuid>,
    pub n_classifier_model_id: Option<Uuid>,
}

impl Sdg {
    pub fn new(slice_id: Uuid, sdg_number: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            slice_id,
            sdg_number,
            created_at: local_timestamp(),
            bi_classifier_model_id: None,
            n_classifier_model_id: None,
        }
    }
}

impl Entity for Sdg {
    const ENTITY: &'static str = "Sdg";
    const TABLE: &'static str = "sdg";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "slice_id",
        "sdg_number",
        "created_at",
        "bi_classifier_model_id",
        "n_classifier_model_id",
    ];

    fn values(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("id", self.id.into()),
            ("slice_id", self.slice_id.into()),
            ("sdg_number", self.sdg_number.into()),
            ("created_at", self.created_at.into()),
            ("bi_classifier_model_id", self.bi_classifier_model_id.into()),
            ("n_classifier_model_id", self.n_classifier_model_id.into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{seed_corpus, seed_document, setup_test_db};
    use crate::error::Error;
    use crate::models::{BiClassifierModel, EmbeddingModel, NClassifierModel};

    const CONTENT: &str =
        "This is a test document, used for unit testing, please ignore. Thank you!";

    #[tokio::test]
    async fn test_document_round_trip() {
        let (db, _tmp) = setup_test_db().await;
        let mut session = db.session();
        let corpus = seed_corpus(&mut session).await;

        let doc = WeLearnDocument::new(DocumentDraft {
            url: "https://example.com/test-document".to_string(),
            title: Some("Test Document".to_string()),
            lang: Some("en".to_string()),
            description: Some("<p>A short description.</p>".to_string()),
            full_content: Some(CONTENT.to_string()),
            details: Some(serde_json::json!({"author": "Test Author", "pages": 3})),
            corpus_id: corpus.id,
        })
        .unwrap();
        session.add(&doc).unwrap();
        session.flush().await.unwrap();

        let stored: WeLearnDocument = session
            .find_one_by("url", "https://example.com/test-document")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, doc.id);
        assert_eq!(stored.description.as_deref(), Some("A short description."));
        assert_eq!(stored.trace, compute_trace(Some(CONTENT)));
        assert_eq!(stored.details().unwrap()["author"], "Test Author");
        assert_eq!(stored.details().unwrap()["pages"], 3);
    }

    #[tokio::test]
    async fn test_document_url_is_unique() {
        let (db, _tmp) = setup_test_db().await;
        let mut session = db.session();
        let corpus = seed_corpus(&mut session).await;
        seed_document(&mut session, corpus.id, "https://example.com/a").await;

        let mut duplicate = WeLearnDocument::new(DocumentDraft {
            url: "https://example.com/a".to_string(),
            description: Some("Other".to_string()),
            full_content: Some(CONTENT.to_string()),
            corpus_id: corpus.id,
            ..Default::default()
        })
        .unwrap();
        duplicate.title = Some("Duplicate".to_string());
        session.add(&duplicate).unwrap();
        assert!(matches!(session.flush().await, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn test_document_requires_existing_corpus() {
        let (db, _tmp) = setup_test_db().await;
        let mut session = db.session();

        let doc = WeLearnDocument::new(DocumentDraft {
            url: "https://example.com/orphan".to_string(),
            description: Some("Orphan".to_string()),
            full_content: Some(CONTENT.to_string()),
            corpus_id: Uuid::new_v4(),
            ..Default::default()
        })
        .unwrap();
        session.add(&doc).unwrap();
        assert!(matches!(session.flush().await, Err(Error::Database(_))));
    }

    #[test]
    fn test_set_full_content_updates_trace() {
        let mut doc = WeLearnDocument::new(DocumentDraft {
            url: "https://example.com/doc".to_string(),
            description: Some("Description".to_string()),
            full_content: Some(CONTENT.to_string()),
            ..Default::default()
        })
        .unwrap();
        let before = doc.trace;

        let validator = DocumentValidator::default();
        doc.set_full_content(
            "<b>An entirely different body of text, long enough.</b>",
            &validator,
        )
        .unwrap();
        assert_eq!(
            doc.full_content.as_deref(),
            Some("An entirely different body of text, long enough.")
        );
        assert_ne!(doc.trace, before);

        // Rejected content leaves the document unchanged
        let err = doc.set_full_content("short", &validator).unwrap_err();
        assert!(matches!(err, Error::FullContentTooShort { .. }));
        assert_eq!(
            doc.full_content.as_deref(),
            Some("An entirely different body of text, long enough.")
        );
    }

    #[test]
    fn test_content_changed() {
        let mut doc = WeLearnDocument::new(DocumentDraft {
            url: "https://example.com/doc".to_string(),
            description: Some("Description".to_string()),
            full_content: Some(CONTENT.to_string()),
            ..Default::default()
        })
        .unwrap();

        assert!(!doc.content_changed(&format!("<div>  {}  </div>", CONTENT)));
        assert!(doc.content_changed("Something else entirely, for sure."));

        doc.set_description("<i>New</i>   description").unwrap();
        assert_eq!(doc.description.as_deref(), Some("New description"));
    }

    #[tokio::test]
    async fn test_process_state_operation_order() {
        let (db, _tmp) = setup_test_db().await;
        let mut session = db.session();
        let corpus = seed_corpus(&mut session).await;
        let doc = seed_document(&mut session, corpus.id, "https://example.com/a").await;

        for step in [Step::UrlRetrieved, Step::DocumentScraped, Step::DocumentInQdrant] {
            session.add(&ProcessState::new(doc.id, step)).unwrap();
        }
        session.flush().await.unwrap();

        let mut states: Vec<ProcessState> = session.find_by("document_id", doc.id).await.unwrap();
        states.sort_by_key(|s| s.operation_order);
        let orders: Vec<Option<i64>> = states.iter().map(|s| s.operation_order).collect();
        assert_eq!(orders, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(states[2].step().unwrap(), Step::DocumentInQdrant);
    }

    #[tokio::test]
    async fn test_process_state_rejects_unknown_step() {
        let (db, _tmp) = setup_test_db().await;
        let mut session = db.session();
        let corpus = seed_corpus(&mut session).await;
        let doc = seed_document(&mut session, corpus.id, "https://example.com/a").await;

        let mut state = ProcessState::new(doc.id, Step::UrlRetrieved);
        state.title = "teleported".to_string();
        assert!(state.step().is_err());
        session.add(&state).unwrap();
        assert!(matches!(session.flush().await, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn test_keywords() {
        let (db, _tmp) = setup_test_db().await;
        let mut session = db.session();
        let corpus = seed_corpus(&mut session).await;
        let doc = seed_document(&mut session, corpus.id, "https://example.com/a").await;

        let keyword = Keyword::new("climate");
        session.add(&keyword).unwrap();
        session
            .add(&WeLearnDocumentKeyword::new(doc.id, keyword.id))
            .unwrap();
        session.flush().await.unwrap();

        let links: Vec<WeLearnDocumentKeyword> = session
            .find_by("welearn_document_id", doc.id)
            .await
            .unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].keyword_id, keyword.id);

        session
            .add(&WeLearnDocumentKeyword::new(doc.id, keyword.id))
            .unwrap();
        assert!(session.flush().await.is_err());
        session.rollback();

        session.add(&Keyword::new("climate")).unwrap();
        assert!(session.flush().await.is_err());
    }

    #[tokio::test]
    async fn test_error_retrieval() {
        let (db, _tmp) = setup_test_db().await;
        let mut session = db.session();
        let corpus = seed_corpus(&mut session).await;
        let doc = seed_document(&mut session, corpus.id, "https://example.com/a").await;

        session
            .add(&ErrorRetrieval::new(doc.id, Some(404), "Not Found"))
            .unwrap();
        session
            .add(&ErrorRetrieval::new(doc.id, None, "connection reset"))
            .unwrap();
        session.flush().await.unwrap();

        let without_code: Vec<ErrorRetrieval> =
            session.find_by("http_error_code", None::<i64>).await.unwrap();
        assert_eq!(without_code.len(), 1);
        assert_eq!(without_code[0].error_info, "connection reset");
    }

    #[tokio::test]
    async fn test_slices_and_sdgs() {
        let (db, _tmp) = setup_test_db().await;
        let mut session = db.session();
        let corpus = seed_corpus(&mut session).await;
        let doc = seed_document(&mut session, corpus.id, "https://example.com/a").await;

        let model = EmbeddingModel::new("all-minilm-l6-v2", "en");
        let bi = BiClassifierModel::new("bi", "en", 0.5);
        let n = NClassifierModel::new("n", "en");
        let mut slice = DocumentSlice::new(doc.id, 0, "First slice", model.id, &model.title);
        slice.embedding = Some(vec![0, 1, 2, 3]);

        let mut sdg = Sdg::new(slice.id, 13);
        sdg.bi_classifier_model_id = Some(bi.id);
        sdg.n_classifier_model_id = Some(n.id);

        session.add(&model).unwrap();
        session.add(&bi).unwrap();
        session.add(&n).unwrap();
        session.add(&slice).unwrap();
        session.add(&sdg).unwrap();
        session.flush().await.unwrap();

        let stored: DocumentSlice = session.get(slice.id).await.unwrap().unwrap();
        assert_eq!(stored.embedding, Some(vec![0, 1, 2, 3]));
        assert_eq!(stored.embedding_model_name, "all-minilm-l6-v2");

        let sdgs: Vec<Sdg> = session.find_by("slice_id", slice.id).await.unwrap();
        assert_eq!(sdgs.len(), 1);
        assert_eq!(sdgs[0].sdg_number, 13);
        assert_eq!(sdgs[0].bi_classifier_model_id, Some(bi.id));

        // Out-of-range SDG numbers fail the CHECK constraint
        session.add(&Sdg::new(slice.id, 18)).unwrap();
        assert!(matches!(session.flush().await, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn test_analytic_counter() {
        let (db, _tmp) = setup_test_db().await;
        let mut session = db.session();
        let corpus = seed_corpus(&mut session).await;
        let doc = seed_document(&mut session, corpus.id, "https://example.com/a").await;

        let mut counter = AnalyticCounter::new(doc.id, Counter::Click);
        session.add(&counter).unwrap();
        session.flush().await.unwrap();

        counter.increment();
        counter.increment();
        session.update(&counter).unwrap();
        session.flush().await.unwrap();

        let stored: AnalyticCounter = session.get(counter.id).await.unwrap().unwrap();
        assert_eq!(stored.counter_value, 2);
        assert_eq!(stored.counter().unwrap(), Counter::Click);

        let mut bogus = AnalyticCounter::new(doc.id, Counter::Hit);
        bogus.counter_name = "view".to_string();
        session.add(&bogus).unwrap();
        assert!(matches!(session.flush().await, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn test_session_rechecks_changed_document() {
        let (db, _tmp) = setup_test_db().await;
        let mut session = db.session();
        let corpus = seed_corpus(&mut session).await;
        let mut doc = seed_document(&mut session, corpus.id, "https://example.com/a").await;

        doc.url = "http://insecure.example.com/x".to_string();
        assert!(matches!(
            session.update(&doc),
            Err(Error::InvalidUrlScheme(_))
        ));

        doc.url = "https://example.com/a".to_string();
        doc.full_content = Some("x".to_string());
        assert!(matches!(
            session.update(&doc),
            Err(Error::FullContentTooShort { .. })
        ));
        assert_eq!(session.pending_len(), 0);

        let stored: WeLearnDocument = session.get(doc.id).await.unwrap().unwrap();
        assert_eq!(stored.url, "https://example.com/a");
        assert_ne!(stored.full_content.as_deref(), Some("x"));

        // Changes made through the setters pass
        doc.set_full_content(
            "Fresh content for the document, long enough to pass.",
            &DocumentValidator::default(),
        )
        .unwrap();
        session.update(&doc).unwrap();
        session.flush().await.unwrap();
    }

    #[tokio::test]
    async fn test_session_rejects_invalid_new_document() {
        let (db, _tmp) = setup_test_db().await;
        let mut session = db.session();
        let corpus = seed_corpus(&mut session).await;

        let mut doc = WeLearnDocument::new(DocumentDraft {
            url: "https://example.com/new".to_string(),
            description: Some("Description".to_string()),
            full_content: Some(CONTENT.to_string()),
            corpus_id: corpus.id,
            ..Default::default()
        })
        .unwrap();
        doc.trace = Some(0);
        assert!(matches!(
            session.add(&doc),
            Err(Error::TraceMismatch { .. })
        ));
        assert_eq!(session.count::<WeLearnDocument>().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_process_state_update_keeps_operation_order() {
        let (db, _tmp) = setup_test_db().await;
        let mut session = db.session();
        let corpus = seed_corpus(&mut session).await;
        let doc = seed_document(&mut session, corpus.id, "https://example.com/a").await;

        let state = ProcessState::new(doc.id, Step::DocumentInQdrant);
        session.add(&state).unwrap();
        session.flush().await.unwrap();

        // The in-memory copy never learned its order
        assert_eq!(state.operation_order, None);
        session.update(&state).unwrap();
        session.flush().await.unwrap();

        let stored: ProcessState = session.get(state.id).await.unwrap().unwrap();
        assert_eq!(stored.operation_order, Some(1));

        let in_qdrant: Vec<crate::models::QtyDocumentInQdrant> = session.all().await.unwrap();
        assert_eq!(in_qdrant.len(), 1);
        assert_eq!(in_qdrant[0].document_in_qdrant, 1);

        // An explicit order is still written
        let mut reordered = stored;
        reordered.operation_order = Some(10);
        session.update(&reordered).unwrap();
        session.flush().await.unwrap();
        let stored: ProcessState = session.get(state.id).await.unwrap().unwrap();
        assert_eq!(stored.operation_order, Some(10));
    }
}
