use super::ITemplateRepo;
use crate::repos::shared::inmemory_repo::*;
use greentick_domain::{Template, ID};

pub struct InMemoryTemplateRepo {
    templates: std::sync::Mutex<Vec<Template>>,
}

impl InMemoryTemplateRepo {
    pub fn new() -> Self {
        Self {
            templates: std::sync::Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl ITemplateRepo for InMemoryTemplateRepo {
    async fn insert(&self, template: &Template) -> anyhow::Result<()> {
        insert(template, &self.templates);
        Ok(())
    }

    async fn save(&self, template: &Template) -> anyhow::Result<()> {
        save(template, &self.templates);
        Ok(())
    }

    async fn find(&self, template_id: &str) -> Option<Template> {
        find(&template_id.to_string(), &self.templates)
    }

    async fn find_visible(&self, user_id: &ID) -> Vec<Template> {
        let mut templates = find_by(&self.templates, |t| t.is_visible_to(user_id));
        templates.sort_by(|a, b| {
            (a.user_id.is_some(), a.created, &a.name).cmp(&(b.user_id.is_some(), b.created, &b.name))
        });
        templates
    }

    async fn seed_builtin(&self) -> anyhow::Result<()> {
        for template in Template::builtin_catalog() {
            if find(&template.id, &self.templates).is_none() {
                insert(&template, &self.templates);
            }
        }
        Ok(())
    }
}
