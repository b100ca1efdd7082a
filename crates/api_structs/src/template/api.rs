use crate::dtos::TemplateDTO;
use greentick_domain::{Template, TemplateVariables};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub template: TemplateDTO,
}

impl TemplateResponse {
    pub fn new(template: Template) -> Self {
        Self {
            template: TemplateDTO::new(template),
        }
    }
}

pub mod get_templates {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub templates: Vec<TemplateDTO>,
    }

    impl APIResponse {
        pub fn new(templates: Vec<Template>) -> Self {
            Self {
                templates: templates.into_iter().map(TemplateDTO::new).collect(),
            }
        }
    }
}

pub mod create_template {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        #[serde(default)]
        pub description: Option<String>,
        pub body: String,
    }

    pub type APIResponse = TemplateResponse;
}

pub mod update_template {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub template_id: String,
    }

    #[derive(Debug, Deserialize, Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub body: Option<String>,
    }

    pub type APIResponse = TemplateResponse;
}

pub mod preview_template {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub template_id: String,
        #[serde(default)]
        pub variables: TemplateVariables,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub template_id: String,
        pub version: i64,
        pub message: String,
    }
}
