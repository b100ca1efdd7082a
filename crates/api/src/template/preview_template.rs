use crate::error::GreentickError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::preview_template::*;
use greentick_domain::{TemplateError, TemplateVariables, ID};
use greentick_infra::GreentickContext;

pub async fn preview_template_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, _policy) = protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = PreviewTemplateUseCase {
        user_id,
        template_id: body.template_id,
        variables: body.variables,
    };

    execute(usecase, &ctx)
        .await
        .map(|preview| HttpResponse::Ok().json(preview))
        .map_err(GreentickError::from)
}

/// Renders a template without storing anything
#[derive(Debug)]
pub struct PreviewTemplateUseCase {
    pub user_id: ID,
    pub template_id: String,
    pub variables: TemplateVariables,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(String),
    MissingVariables(TemplateError),
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The template with id: {}, was not found.", id))
            }
            UseCaseError::MissingVariables(e) => Self::BadClientData(e.to_string()),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for PreviewTemplateUseCase {
    type Response = APIResponse;
    type Error = UseCaseError;

    const NAME: &'static str = "PreviewTemplate";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        let template = match ctx.repos.templates.find(&self.template_id).await {
            Some(template) if template.is_visible_to(&self.user_id) => template,
            _ => return Err(UseCaseError::NotFound(self.template_id.clone())),
        };

        let message = template
            .render(&self.variables)
            .map_err(UseCaseError::MissingVariables)?;

        Ok(APIResponse {
            template_id: template.id,
            version: template.version,
            message,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn variables(entries: &[(&str, &str)]) -> TemplateVariables {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[actix_web::main]
    #[test]
    async fn previews_builtin_template() {
        let ctx = GreentickContext::create_inmemory().await;
        let mut usecase = PreviewTemplateUseCase {
            user_id: ID::new(),
            template_id: "payment_reminder".into(),
            variables: variables(&[
                ("customer_name", "Asha"),
                ("amount", "Rs. 500"),
                ("due_date", "5 Jan"),
                ("business_name", "Green Tick"),
            ]),
        };
        let preview = usecase.execute(&ctx).await.unwrap();
        assert_eq!(preview.version, 1);
        assert_eq!(
            preview.message,
            "Hi Asha, this is a reminder that your payment of Rs. 500 is due on 5 Jan. Please pay at your earliest convenience. - Green Tick"
        );

        usecase.variables.remove("due_date");
        match usecase.execute(&ctx).await {
            Err(UseCaseError::MissingVariables(TemplateError::MissingVariables(missing))) => {
                assert_eq!(missing, vec!["due_date".to_string()])
            }
            _ => panic!("Expected missing variables"),
        }

        usecase.template_id = "unknown".into();
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotFound(_))
        ));
    }
}
