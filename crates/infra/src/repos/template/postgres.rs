use super::ITemplateRepo;
use greentick_domain::{Template, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresTemplateRepo {
    pool: PgPool,
}

impl PostgresTemplateRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TemplateRaw {
    template_id: String,
    user_uid: Option<Uuid>,
    name: String,
    description: String,
    body: String,
    version: i64,
    created: i64,
    updated: i64,
}

impl From<TemplateRaw> for Template {
    fn from(e: TemplateRaw) -> Self {
        Self {
            id: e.template_id,
            user_id: e.user_uid.map(|id| id.into()),
            name: e.name,
            description: e.description,
            body: e.body,
            version: e.version,
            created: e.created,
            updated: e.updated,
        }
    }
}

#[async_trait::async_trait]
impl ITemplateRepo for PostgresTemplateRepo {
    async fn insert(&self, template: &Template) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO templates(template_id, user_uid, name, description, body, version, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&template.id)
        .bind(template.user_id.map(|id| *id.inner_ref()))
        .bind(&template.name)
        .bind(&template.description)
        .bind(&template.body)
        .bind(template.version)
        .bind(template.created)
        .bind(template.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert template: {:?}. DB returned error: {:?}",
                template, e
            );
            e
        })?;

        Ok(())
    }

    async fn save(&self, template: &Template) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE templates SET
                name = $2,
                description = $3,
                body = $4,
                version = $5,
                updated = $6
            WHERE template_id = $1
            "#,
        )
        .bind(&template.id)
        .bind(&template.name)
        .bind(&template.description)
        .bind(&template.body)
        .bind(template.version)
        .bind(template.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to save template: {:?}. DB returned error: {:?}",
                template, e
            );
            e
        })?;

        Ok(())
    }

    async fn find(&self, template_id: &str) -> Option<Template> {
        let res: Option<TemplateRaw> = sqlx::query_as(
            r#"
            SELECT * FROM templates AS t
            WHERE t.template_id = $1
            "#,
        )
        .bind(template_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find template with id: {:?} failed. DB returned error: {:?}",
                template_id, e
            );
            e
        })
        .ok()?;

        res.map(|template| template.into())
    }

    async fn find_visible(&self, user_id: &ID) -> Vec<Template> {
        let templates: Vec<TemplateRaw> = sqlx::query_as(
            r#"
            SELECT * FROM templates AS t
            WHERE t.user_uid IS NULL OR t.user_uid = $1
            ORDER BY t.user_uid IS NOT NULL, t.created, t.name
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find templates visible to user: {:?} failed. DB returned error: {:?}",
                user_id, e
            );
            e
        })
        .unwrap_or_default();

        templates.into_iter().map(|t| t.into()).collect()
    }

    async fn seed_builtin(&self) -> anyhow::Result<()> {
        for template in Template::builtin_catalog() {
            sqlx::query(
                r#"
                INSERT INTO templates(template_id, user_uid, name, description, body, version, created, updated)
                VALUES($1, NULL, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (template_id) DO NOTHING
                "#,
            )
            .bind(&template.id)
            .bind(&template.name)
            .bind(&template.description)
            .bind(&template.body)
            .bind(template.version)
            .bind(template.created)
            .bind(template.updated)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }
}
