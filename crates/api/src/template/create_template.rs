use crate::error::GreentickError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::create_template::*;
use greentick_domain::{Template, TemplateError, ID};
use greentick_infra::GreentickContext;

pub async fn create_template_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, policy) = protect_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = CreateTemplateUseCase {
        user_id,
        name: body.name,
        description: body.description.unwrap_or_default(),
        body: body.body,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|template| HttpResponse::Created().json(APIResponse::new(template)))
        .map_err(GreentickError::from)
}

#[derive(Debug)]
pub struct CreateTemplateUseCase {
    pub user_id: ID,
    pub name: String,
    pub description: String,
    pub body: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidTemplate(TemplateError),
    StorageError,
}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidTemplate(e) => Self::BadClientData(e.to_string()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateTemplateUseCase {
    type Response = Template;
    type Error = UseCaseError;

    const NAME: &'static str = "CreateTemplate";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        let template = Template::new(
            Some(self.user_id),
            self.name.trim().to_string(),
            self.description.clone(),
            self.body.clone(),
            ctx.sys.get_timestamp_millis(),
        )
        .map_err(UseCaseError::InvalidTemplate)?;

        ctx.repos
            .templates
            .insert(&template)
            .await
            .map(|_| template)
            .map_err(|_| UseCaseError::StorageError)
    }
}

impl PermissionBoundary for CreateTemplateUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::CreateTemplate]
    }
}
