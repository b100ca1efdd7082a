use crate::base::{APIResponse, BaseClient};
use greentick_api_structs::*;
use greentick_domain::TemplateVariables;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct TemplateClient {
    base: Arc<BaseClient>,
}

pub struct CreateTemplateInput {
    pub name: String,
    pub description: Option<String>,
    pub body: String,
}

#[derive(Default)]
pub struct UpdateTemplateInput {
    pub template_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

pub struct PreviewTemplateInput {
    pub template_id: String,
    pub variables: TemplateVariables,
}

impl TemplateClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn list(&self) -> APIResponse<get_templates::APIResponse> {
        self.base
            .get("reminders/templates".into(), StatusCode::OK)
            .await
    }

    pub async fn create(
        &self,
        input: CreateTemplateInput,
    ) -> APIResponse<create_template::APIResponse> {
        let body = create_template::RequestBody {
            name: input.name,
            description: input.description,
            body: input.body,
        };
        self.base
            .post(body, "reminders/templates".into(), StatusCode::CREATED)
            .await
    }

    pub async fn update(
        &self,
        input: UpdateTemplateInput,
    ) -> APIResponse<update_template::APIResponse> {
        let body = update_template::RequestBody {
            name: input.name,
            description: input.description,
            body: input.body,
        };
        self.base
            .put(
                body,
                format!("reminders/templates/{}", input.template_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn preview(
        &self,
        input: PreviewTemplateInput,
    ) -> APIResponse<preview_template::APIResponse> {
        let body = preview_template::RequestBody {
            template_id: input.template_id,
            variables: input.variables,
        };
        self.base
            .post(body, "reminders/preview-template".into(), StatusCode::OK)
            .await
    }
}
