//! MongoDB-backed document store

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};

use crate::{DocumentStore, Error, ProjectId, ProjectSummary, Result, StoreAddress, UserId};

const USERS: &str = "users";
const PROJECTS: &str = "projects";

/// Access relationship fields on a project document. The collaborator
/// field name is misspelled in the platform's schema.
const ACCESS_FIELDS: [&str; 3] = ["owner_ref", "collaberator_refs", "readOnly_refs"];

/// Document store backed by the platform's MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Create a client for `address`.
    ///
    /// The driver connects lazily, so an unreachable server surfaces on the
    /// first query rather than here.
    pub async fn connect(address: &StoreAddress) -> Result<Self> {
        let options = ClientOptions::parse(&address.uri).await?;
        let client = Client::with_options(options)?;
        let database = client.database(&address.database);
        tracing::debug!(host = %address.host, port = address.port, database = %address.database, "Document store client created");
        Ok(Self { client, database })
    }

    fn users(&self) -> Collection<Document> {
        self.database.collection(USERS)
    }

    fn projects(&self) -> Collection<Document> {
        self.database.collection(PROJECTS)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn parse_project_id(&self, raw: &str) -> Result<ProjectId> {
        let oid = ObjectId::parse_str(raw.trim()).map_err(|e| Error::InvalidProjectId {
            id: raw.to_string(),
            message: e.to_string(),
        })?;
        Ok(ProjectId::new(oid.to_hex()))
    }

    async fn find_user_id(&self, email: &str) -> Result<Option<UserId>> {
        let user = self.users().find_one(doc! { "email": email }).await?;
        match user {
            Some(user) => {
                let id = user.get("_id").ok_or_else(|| Error::MalformedDocument {
                    collection: USERS.to_string(),
                    message: "user document has no _id".to_string(),
                })?;
                Ok(Some(user_id_from_bson(id)))
            }
            None => Ok(None),
        }
    }

    async fn has_project_access(&self, user: &UserId, project: &ProjectId) -> Result<bool> {
        let project_oid =
            ObjectId::parse_str(project.as_str()).map_err(|e| Error::InvalidProjectId {
                id: project.to_string(),
                message: e.to_string(),
            })?;

        let mut filter = access_filter(user);
        filter.insert("_id", project_oid);

        let matches = self.projects().count_documents(filter).limit(1).await?;
        Ok(matches > 0)
    }

    async fn list_accessible_projects(&self, user: &UserId) -> Result<Vec<ProjectSummary>> {
        let projection = doc! {
            "name": 1,
            "lastUpdated": 1,
            "publicAccessLevel": 1,
            "archived": 1,
            "trashed": 1,
            "_id": 1,
        };
        let mut cursor = self
            .projects()
            .find(access_filter(user))
            .projection(projection)
            .await?;

        let mut projects = Vec::new();
        while let Some(project) = cursor.try_next().await? {
            if is_hidden(&project) {
                continue;
            }
            projects.push(summary_from_document(&project)?);
        }
        Ok(projects)
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        tracing::debug!("Document store client closed");
    }
}

/// `{"$or": [{"owner_ref": u}, {"collaberator_refs": u}, {"readOnly_refs": u}]}`
fn access_filter(user: &UserId) -> Document {
    let user_ref = user_ref(user);
    let clauses: Vec<Document> = ACCESS_FIELDS
        .iter()
        .map(|field| {
            let mut clause = Document::new();
            clause.insert(*field, user_ref.clone());
            clause
        })
        .collect();
    doc! { "$or": clauses }
}

/// Convert a `UserId` back to the value stored in reference fields.
fn user_ref(user: &UserId) -> Bson {
    match ObjectId::parse_str(user.as_str()) {
        Ok(oid) => Bson::ObjectId(oid),
        Err(_) => Bson::String(user.as_str().to_string()),
    }
}

/// The spelling of a project id used in workspace names: trimmed, and
/// lowercase hex when it is an ObjectId.
pub fn canonical_project_id(raw: &str) -> String {
    let trimmed = raw.trim();
    match ObjectId::parse_str(trimmed) {
        Ok(oid) => oid.to_hex(),
        Err(_) => trimmed.to_string(),
    }
}

fn user_id_from_bson(value: &Bson) -> UserId {
    match value {
        Bson::ObjectId(oid) => UserId::new(oid.to_hex()),
        Bson::String(s) => UserId::new(s.clone()),
        other => UserId::new(other.to_string()),
    }
}

/// Archived/trashed flags are booleans in older schemas and per-user id
/// arrays in newer ones; either a `true` or a non-empty array hides the
/// project.
fn is_truthy(value: Option<&Bson>) -> bool {
    match value {
        Some(Bson::Boolean(flag)) => *flag,
        Some(Bson::Array(items)) => !items.is_empty(),
        Some(Bson::Null) | None => false,
        Some(_) => true,
    }
}

fn is_hidden(project: &Document) -> bool {
    is_truthy(project.get("archived")) || is_truthy(project.get("trashed"))
}

fn summary_from_document(project: &Document) -> Result<ProjectSummary> {
    let id = match project.get("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => {
            return Err(Error::MalformedDocument {
                collection: PROJECTS.to_string(),
                message: "project document has no _id".to_string(),
            });
        }
    };
    let name = project.get_str("name").map_err(|e| Error::MalformedDocument {
        collection: PROJECTS.to_string(),
        message: format!("project {id}: {e}"),
    })?;
    Ok(ProjectSummary::new(id, name))
}
