use crate::error::IngestError;
use crate::models::Record;
use crate::traits::RecordSource;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::Client;
use serde_json::json;
use std::collections::HashMap;

/// Fetches every document of one MongoDB collection and flattens the
/// configured fields into record text.
pub struct MongoRecordSource {
    connection_string: String,
    db_name: String,
    collection_name: String,
    field_names: Vec<String>,
}

impl MongoRecordSource {
    pub fn new(
        connection_string: impl Into<String>,
        db_name: impl Into<String>,
        collection_name: impl Into<String>,
        field_names: Vec<String>,
    ) -> Self {
        Self {
            connection_string: connection_string.into(),
            db_name: db_name.into(),
            collection_name: collection_name.into(),
            field_names,
        }
    }
}

#[async_trait]
impl RecordSource for MongoRecordSource {
    async fn fetch_records(&self) -> Result<Vec<Record>, IngestError> {
        let client = Client::with_uri_str(&self.connection_string).await?;
        let collection = client
            .database(&self.db_name)
            .collection::<Document>(&self.collection_name);

        let mut cursor = collection.find(doc! {}).await?;
        let mut records = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            records.push(record_from_document(
                &document,
                &self.field_names,
                &self.db_name,
                &self.collection_name,
            )?);
        }

        Ok(records)
    }
}

/// Concatenates the selected fields (space-separated, in configured order)
/// into the record text. A document missing a selected field or its `_id`
/// is malformed and fails the fetch.
pub fn record_from_document(
    document: &Document,
    field_names: &[String],
    db_name: &str,
    collection_name: &str,
) -> Result<Record, IngestError> {
    let record_id = match document.get("_id") {
        Some(Bson::ObjectId(id)) => id.to_hex(),
        Some(other) => bson_text(other),
        None => {
            return Err(IngestError::SourceFetch(
                "document has no _id field".to_string(),
            ))
        }
    };

    let mut parts = Vec::with_capacity(field_names.len());
    for field in field_names {
        let value = document.get(field).ok_or_else(|| {
            IngestError::SourceFetch(format!("document {record_id} has no field '{field}'"))
        })?;
        parts.push(bson_text(value));
    }

    let mut metadata = HashMap::new();
    metadata.insert("database".to_string(), json!(db_name));
    metadata.insert("collection".to_string(), json!(collection_name));
    metadata.insert("source".to_string(), json!(record_id));

    Ok(Record {
        record_id,
        text: parts.join(" "),
        metadata,
    })
}

fn bson_text(value: &Bson) -> String {
    match value {
        Bson::String(text) => text.clone(),
        other => other.to_string(),
    }
}
