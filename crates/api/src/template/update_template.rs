use crate::error::GreentickError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::update_template::*;
use greentick_domain::{Template, TemplateError, ID};
use greentick_infra::GreentickContext;

pub async fn update_template_controller(
    http_req: HttpRequest,
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, policy) = protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = UpdateTemplateUseCase {
        user_id,
        template_id: path.into_inner().template_id,
        name: body.name,
        description: body.description,
        body: body.body,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|template| HttpResponse::Ok().json(APIResponse::new(template)))
        .map_err(GreentickError::from)
}

/// Changes a template owned by the user. Built in templates are read only.
#[derive(Debug)]
pub struct UpdateTemplateUseCase {
    pub user_id: ID,
    pub template_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(String),
    InvalidTemplate(TemplateError),
    StorageError,
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The template with id: {}, was not found.", id))
            }
            UseCaseError::InvalidTemplate(e) => Self::BadClientData(e.to_string()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateTemplateUseCase {
    type Response = Template;
    type Error = UseCaseError;

    const NAME: &'static str = "UpdateTemplate";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        let mut template = match ctx.repos.templates.find(&self.template_id).await {
            Some(template) if template.user_id == Some(self.user_id) => template,
            _ => return Err(UseCaseError::NotFound(self.template_id.clone())),
        };

        template
            .update(
                self.name.as_ref().map(|name| name.trim().to_string()),
                self.description.clone(),
                self.body.clone(),
                ctx.sys.get_timestamp_millis(),
            )
            .map_err(UseCaseError::InvalidTemplate)?;

        ctx.repos
            .templates
            .save(&template)
            .await
            .map(|_| template)
            .map_err(|_| UseCaseError::StorageError)
    }
}

impl PermissionBoundary for UpdateTemplateUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::UpdateTemplate]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::usecase::execute;

    #[actix_web::main]
    #[test]
    async fn only_owned_templates_can_be_updated() {
        let ctx = GreentickContext::create_inmemory().await;
        let user_id = ID::new();
        let template = Template::new(
            Some(user_id),
            "Offer".into(),
            "".into(),
            "Hi {customer_name}".into(),
            0,
        )
        .unwrap();
        ctx.repos.templates.insert(&template).await.unwrap();

        let update = |user_id: ID, template_id: &str| UpdateTemplateUseCase {
            user_id,
            template_id: template_id.into(),
            name: None,
            description: Some("Seasonal offer".into()),
            body: Some("Hello {customer_name}".into()),
        };

        let updated = execute(update(user_id, &template.id), &ctx).await.unwrap();
        assert_eq!(updated.version, 2);
        assert_eq!(updated.body, "Hello {customer_name}");
        assert_eq!(updated.description, "Seasonal offer");

        assert!(matches!(
            execute(update(ID::new(), &template.id), &ctx).await,
            Err(UseCaseError::NotFound(_))
        ));
        assert!(matches!(
            execute(update(user_id, "payment_reminder"), &ctx).await,
            Err(UseCaseError::NotFound(_))
        ));
    }
}
