//! SQLite schema definition

use crate::models::DbSchema;

/// SQL schema for the WeLearn database
pub const SCHEMA_SQL: &str = r#"
-- ===== corpus_related =====

CREATE TABLE IF NOT EXISTS category (
    id BLOB PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS corpus (
    id BLOB PRIMARY KEY NOT NULL,
    source_name TEXT NOT NULL,
    is_fix INTEGER NOT NULL,
    binary_treshold REAL NOT NULL DEFAULT 0.5,
    is_active INTEGER NOT NULL DEFAULT 1,
    category_id BLOB NOT NULL REFERENCES category(id),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    CONSTRAINT corpus_source_name_key UNIQUE (source_name)
);

CREATE TABLE IF NOT EXISTS embedding_model (
    id BLOB PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    lang TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS bi_classifier_model (
    id BLOB PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    binary_treshold REAL NOT NULL DEFAULT 0.5,
    lang TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS n_classifier_model (
    id BLOB PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    lang TEXT NOT NULL,
    treshold_sdg_1 REAL,
    treshold_sdg_2 REAL,
    treshold_sdg_3 REAL,
    treshold_sdg_4 REAL,
    treshold_sdg_5 REAL,
    treshold_sdg_6 REAL,
    treshold_sdg_7 REAL,
    treshold_sdg_8 REAL,
    treshold_sdg_9 REAL,
    treshold_sdg_10 REAL,
    treshold_sdg_11 REAL,
    treshold_sdg_12 REAL,
    treshold_sdg_13 REAL,
    treshold_sdg_14 REAL,
    treshold_sdg_15 REAL,
    treshold_sdg_16 REAL,
    treshold_sdg_17 REAL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS corpus_embedding_model (
    corpus_id BLOB NOT NULL REFERENCES corpus(id),
    embedding_model_id BLOB NOT NULL REFERENCES embedding_model(id),
    used_since TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (corpus_id, embedding_model_id)
);

CREATE TABLE IF NOT EXISTS corpus_n_classifier_model (
    corpus_id BLOB NOT NULL REFERENCES corpus(id),
    n_classifier_model_id BLOB NOT NULL REFERENCES n_classifier_model(id),
    used_since TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (corpus_id, n_classifier_model_id)
);

CREATE TABLE IF NOT EXISTS corpus_bi_classifier_model (
    corpus_id BLOB NOT NULL REFERENCES corpus(id),
    bi_classifier_model_id BLOB NOT NULL REFERENCES bi_classifier_model(id),
    used_since TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (corpus_id, bi_classifier_model_id)
);

-- ===== document_related =====

CREATE TABLE IF NOT EXISTS welearn_document (
    id BLOB PRIMARY KEY NOT NULL,
    url TEXT NOT NULL,
    title TEXT,
    lang TEXT,
    description TEXT,
    full_content TEXT,
    details TEXT,
    trace INTEGER,
    corpus_id BLOB NOT NULL REFERENCES corpus(id),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    CONSTRAINT welearn_document_url_key UNIQUE (url)
);

CREATE TABLE IF NOT EXISTS process_state (
    id BLOB PRIMARY KEY NOT NULL,
    document_id BLOB NOT NULL REFERENCES welearn_document(id),
    title TEXT NOT NULL CHECK (title IN (
        'url_retrieved',
        'document_scraped',
        'document_vectorized',
        'document_classified_sdg',
        'document_classified_non_sdg',
        'document_in_qdrant',
        'document_keywords_extracted',
        'document_is_irretrievable',
        'document_is_invalid',
        'kept_for_trace'
    )),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    operation_order INTEGER
);

-- operation_order behaves like a sequence: inserts leaving it NULL get max + 1
CREATE TRIGGER IF NOT EXISTS process_state_operation_order
AFTER INSERT ON process_state
FOR EACH ROW WHEN NEW.operation_order IS NULL
BEGIN
    UPDATE process_state
    SET operation_order = (SELECT COALESCE(MAX(operation_order), 0) + 1 FROM process_state)
    WHERE id = NEW.id;
END;

CREATE TABLE IF NOT EXISTS keyword (
    id BLOB PRIMARY KEY NOT NULL,
    keyword TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    CONSTRAINT keyword_unique UNIQUE (keyword)
);

CREATE TABLE IF NOT EXISTS welearn_document_keyword (
    id BLOB PRIMARY KEY NOT NULL,
    welearn_document_id BLOB NOT NULL REFERENCES welearn_document(id),
    keyword_id BLOB NOT NULL REFERENCES keyword(id),
    CONSTRAINT unique_welearn_document_keyword_association
        UNIQUE (welearn_document_id, keyword_id)
);

CREATE TABLE IF NOT EXISTS error_retrieval (
    id BLOB PRIMARY KEY NOT NULL,
    document_id BLOB NOT NULL REFERENCES welearn_document(id),
    http_error_code INTEGER,
    error_info TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS document_slice (
    id BLOB PRIMARY KEY NOT NULL,
    document_id BLOB NOT NULL REFERENCES welearn_document(id),
    embedding BLOB,
    body TEXT,
    order_sequence INTEGER NOT NULL,
    embedding_model_name TEXT NOT NULL,
    embedding_model_id BLOB NOT NULL REFERENCES embedding_model(id)
);

CREATE TABLE IF NOT EXISTS analytic_counter (
    id BLOB PRIMARY KEY NOT NULL,
    document_id BLOB NOT NULL REFERENCES welearn_document(id),
    counter_name TEXT NOT NULL CHECK (counter_name IN ('hit', 'click')),
    counter_value INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS sdg (
    id BLOB PRIMARY KEY NOT NULL,
    slice_id BLOB NOT NULL REFERENCES document_slice(id),
    sdg_number INTEGER NOT NULL CHECK (sdg_number BETWEEN 1 AND 17),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    bi_classifier_model_id BLOB REFERENCES bi_classifier_model(id),
    n_classifier_model_id BLOB REFERENCES n_classifier_model(id)
);

-- ===== user_related =====

CREATE TABLE IF NOT EXISTS user_profile (
    id BLOB PRIMARY KEY NOT NULL,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    password_digest BLOB NOT NULL,
    first_name TEXT,
    last_name TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    CONSTRAINT user_profile_username_key UNIQUE (username),
    CONSTRAINT user_profile_email_key UNIQUE (email)
);

CREATE TABLE IF NOT EXISTS inferred_user (
    id BLOB PRIMARY KEY NOT NULL,
    user_id BLOB REFERENCES user_profile(id),
    origin_referrer TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS session (
    id BLOB PRIMARY KEY NOT NULL,
    inferred_user_id BLOB NOT NULL REFERENCES inferred_user(id),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    end_at TEXT NOT NULL,
    host TEXT NOT NULL,
    origin_referrer TEXT
);

CREATE TABLE IF NOT EXISTS bookmark (
    id BLOB PRIMARY KEY NOT NULL,
    document_id BLOB NOT NULL REFERENCES welearn_document(id),
    inferred_user_id BLOB NOT NULL REFERENCES inferred_user(id),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    CONSTRAINT bookmark_document_user_key UNIQUE (document_id, inferred_user_id)
);

CREATE TABLE IF NOT EXISTS chat_message (
    id BLOB PRIMARY KEY NOT NULL,
    inferred_user_id BLOB NOT NULL REFERENCES inferred_user(id),
    conversation_id BLOB NOT NULL,
    role TEXT NOT NULL,
    textual_content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS returned_document (
    id BLOB PRIMARY KEY NOT NULL,
    message_id BLOB NOT NULL REFERENCES chat_message(id),
    document_id BLOB NOT NULL REFERENCES welearn_document(id),
    is_clicked INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS api_key_management (
    id BLOB PRIMARY KEY NOT NULL,
    title TEXT,
    register_email TEXT NOT NULL,
    digest BLOB NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS data_collection_campaign_management (
    id BLOB PRIMARY KEY NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    end_at TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS endpoint_request (
    id BLOB PRIMARY KEY NOT NULL,
    session_id BLOB NOT NULL REFERENCES session(id),
    endpoint_name TEXT NOT NULL,
    http_code INTEGER,
    message TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

-- ===== views =====

-- Documents counted under the step of their most recent process state
CREATE VIEW IF NOT EXISTS document_step_count AS
SELECT d.corpus_id AS corpus_id, ps.title AS step, COUNT(*) AS document_count
FROM welearn_document d
JOIN process_state ps ON ps.document_id = d.id
WHERE ps.operation_order = (
    SELECT MAX(latest.operation_order)
    FROM process_state latest
    WHERE latest.document_id = d.id
)
GROUP BY d.corpus_id, ps.title;

CREATE VIEW IF NOT EXISTS qty_document_in_qdrant AS
SELECT corpus_id, document_count AS document_in_qdrant
FROM document_step_count
WHERE step = 'document_in_qdrant';

-- ===== indexes =====

CREATE INDEX IF NOT EXISTS idx_corpus_category ON corpus(category_id);
CREATE INDEX IF NOT EXISTS idx_document_corpus ON welearn_document(corpus_id);
CREATE INDEX IF NOT EXISTS idx_document_trace ON welearn_document(trace);
CREATE INDEX IF NOT EXISTS idx_process_state_document ON process_state(document_id, operation_order);
CREATE INDEX IF NOT EXISTS idx_slice_document ON document_slice(document_id);
CREATE INDEX IF NOT EXISTS idx_sdg_slice ON sdg(slice_id);
CREATE INDEX IF NOT EXISTS idx_chat_message_conversation ON chat_message(conversation_id);
CREATE INDEX IF NOT EXISTS idx_endpoint_request_session ON endpoint_request(session_id);
"#;

/// Every table, grouped by schema, in creation order
pub const TABLES: &[(DbSchema, &str)] = &[
    (DbSchema::CorpusRelated, "category"),
    (DbSchema::CorpusRelated, "corpus"),
    (DbSchema::CorpusRelated, "embedding_model"),
    (DbSchema::CorpusRelated, "bi_classifier_model"),
    (DbSchema::CorpusRelated, "n_classifier_model"),
    (DbSchema::CorpusRelated, "corpus_embedding_model"),
    (DbSchema::CorpusRelated, "corpus_n_classifier_model"),
    (DbSchema::CorpusRelated, "corpus_bi_classifier_model"),
    (DbSchema::DocumentRelated, "welearn_document"),
    (DbSchema::DocumentRelated, "process_state"),
    (DbSchema::DocumentRelated, "keyword"),
    (DbSchema::DocumentRelated, "welearn_document_keyword"),
    (DbSchema::DocumentRelated, "error_retrieval"),
    (DbSchema::DocumentRelated, "document_slice"),
    (DbSchema::DocumentRelated, "analytic_counter"),
    (DbSchema::DocumentRelated, "sdg"),
    (DbSchema::UserRelated, "user_profile"),
    (DbSchema::UserRelated, "inferred_user"),
    (DbSchema::UserRelated, "session"),
    (DbSchema::UserRelated, "bookmark"),
    (DbSchema::UserRelated, "chat_message"),
    (DbSchema::UserRelated, "returned_document"),
    (DbSchema::UserRelated, "api_key_management"),
    (DbSchema::UserRelated, "data_collection_campaign_management"),
    (DbSchema::UserRelated, "endpoint_request"),
];

/// Read-only views
pub const VIEWS: &[&str] = &["document_step_count", "qty_document_in_qdrant"];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Counter, Step};

    #[test]
    fn test_step_check_covers_every_step() {
        for step in Step::ALL {
            assert!(SCHEMA_SQL.contains(&format!("'{}'", step)), "missing {}", step);
        }
        for counter in [Counter::Hit, Counter::Click] {
            assert!(SCHEMA_SQL.contains(&format!("'{}'", counter)));
        }
    }

    #[test]
    fn test_every_listed_table_is_created() {
        for (_, table) in TABLES {
            assert!(SCHEMA_SQL.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)));
        }
        for view in VIEWS {
            assert!(SCHEMA_SQL.contains(&format!("CREATE VIEW IF NOT EXISTS {} AS", view)));
        }
    }
}
