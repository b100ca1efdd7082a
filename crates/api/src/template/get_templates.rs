use crate::error::GreentickError;
use crate::shared::{
    auth::protect_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use greentick_api_structs::get_templates::*;
use greentick_domain::{Template, ID};
use greentick_infra::GreentickContext;

pub async fn get_templates_controller(
    http_req: HttpRequest,
    ctx: web::Data<GreentickContext>,
) -> Result<HttpResponse, GreentickError> {
    let (user_id, _policy) = protect_route(&http_req, &ctx)?;

    execute(GetTemplatesUseCase { user_id }, &ctx)
        .await
        .map(|templates| HttpResponse::Ok().json(APIResponse::new(templates)))
        .map_err(GreentickError::from)
}

#[derive(Debug)]
pub struct GetTemplatesUseCase {
    pub user_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for GreentickError {
    fn from(e: UseCaseError) -> Self {
        match e {}
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetTemplatesUseCase {
    type Response = Vec<Template>;
    type Error = UseCaseError;

    const NAME: &'static str = "GetTemplates";

    async fn execute(&mut self, ctx: &GreentickContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.templates.find_visible(&self.user_id).await)
    }
}
