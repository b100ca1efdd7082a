use greentick_domain::Template;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDTO {
    pub id: String,
    pub name: String,
    pub description: String,
    pub body: String,
    pub variables: Vec<String>,
    pub version: i64,
    /// Built in templates are shared by every user and read only
    pub global: bool,
    pub created: i64,
    pub updated: i64,
}

impl TemplateDTO {
    pub fn new(template: Template) -> Self {
        Self {
            variables: template.variables(),
            global: template.user_id.is_none(),
            id: template.id,
            name: template.name,
            description: template.description,
            body: template.body,
            version: template.version,
            created: template.created,
            updated: template.updated,
        }
    }
}
