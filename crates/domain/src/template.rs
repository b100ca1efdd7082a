use crate::shared::entity::{Entity, ID};
use itertools::Itertools;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Values to substitute into a `Template`, keyed by variable name
pub type TemplateVariables = HashMap<String, String>;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("Valid placeholder regex"))
}

/// Names of all `{name}` placeholders in `body`, distinct and in order of
/// first appearance.
pub fn extract_variables(body: &str) -> Vec<String> {
    placeholder_regex()
        .captures_iter(body)
        .map(|c| c[1].to_string())
        .unique()
        .collect()
}

/// Replaces every `{name}` placeholder that has an entry in `variables`.
///
/// Placeholders without a value are left as they are and values are
/// inserted verbatim.
pub fn render(body: &str, variables: &TemplateVariables) -> String {
    placeholder_regex()
        .replace_all(body, |c: &regex::Captures| match variables.get(&c[1]) {
            Some(value) => value.clone(),
            None => c[0].to_string(),
        })
        .into_owned()
}

#[derive(Error, Debug, PartialEq)]
pub enum TemplateError {
    #[error("Template body must contain at least one {{variable}} placeholder")]
    NoPlaceholders,
    #[error("Template name can not be empty")]
    EmptyName,
    #[error("Missing values for template variables: {0:?}")]
    MissingVariables(Vec<String>),
}

/// A reusable message body with `{variable}` placeholders.
///
/// Templates without a `user_id` belong to the global catalog and are
/// visible to every user.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub user_id: Option<ID>,
    pub name: String,
    pub description: String,
    pub body: String,
    /// Incremented every time the body, name or description changes
    pub version: i64,
    pub created: i64,
    pub updated: i64,
}

impl Template {
    pub fn new(
        user_id: Option<ID>,
        name: String,
        description: String,
        body: String,
        now: i64,
    ) -> Result<Self, TemplateError> {
        Self::validate(&name, &body)?;
        Ok(Self {
            id: ID::new().as_string(),
            user_id,
            name,
            description,
            body,
            version: 1,
            created: now,
            updated: now,
        })
    }

    fn validate(name: &str, body: &str) -> Result<(), TemplateError> {
        if name.trim().is_empty() {
            return Err(TemplateError::EmptyName);
        }
        if extract_variables(body).is_empty() {
            return Err(TemplateError::NoPlaceholders);
        }
        Ok(())
    }

    pub fn variables(&self) -> Vec<String> {
        extract_variables(&self.body)
    }

    /// Applies the changes and bumps the version when anything changed
    pub fn update(
        &mut self,
        name: Option<String>,
        description: Option<String>,
        body: Option<String>,
        now: i64,
    ) -> Result<(), TemplateError> {
        let name = name.unwrap_or_else(|| self.name.clone());
        let description = description.unwrap_or_else(|| self.description.clone());
        let body = body.unwrap_or_else(|| self.body.clone());
        Self::validate(&name, &body)?;

        if name != self.name || description != self.description || body != self.body {
            self.name = name;
            self.description = description;
            self.body = body;
            self.version += 1;
            self.updated = now;
        }
        Ok(())
    }

    pub fn is_visible_to(&self, user_id: &ID) -> bool {
        match &self.user_id {
            None => true,
            Some(owner) => owner == user_id,
        }
    }

    /// Renders the body and fails if any variable lacks a value
    pub fn render(&self, variables: &TemplateVariables) -> Result<String, TemplateError> {
        let missing = self
            .variables()
            .into_iter()
            .filter(|v| !variables.contains_key(v))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(TemplateError::MissingVariables(missing));
        }
        Ok(render(&self.body, variables))
    }

    /// The global catalog seeded on startup
    pub fn builtin_catalog() -> Vec<Template> {
        let builtin = |id: &str, name: &str, description: &str, body: &str| Template {
            id: id.into(),
            user_id: None,
            name: name.into(),
            description: description.into(),
            body: body.into(),
            version: 1,
            created: 0,
            updated: 0,
        };
        vec![
            builtin(
                "payment_reminder",
                "Payment Reminder",
                "Reminds a customer about an outstanding payment",
                "Hi {customer_name}, this is a reminder that your payment of {amount} is due on {due_date}. Please pay at your earliest convenience. - {business_name}",
            ),
            builtin(
                "appointment_reminder",
                "Appointment Reminder",
                "Reminds a customer about an upcoming appointment",
                "Hi {customer_name}, this is a reminder of your appointment on {date} at {time}. Reply to this message if you need to reschedule. - {business_name}",
            ),
            builtin(
                "payment_confirmation",
                "Payment Confirmation",
                "Thanks a customer for a received payment",
                "Hi {customer_name}, we have received your payment of {amount}. Thank you for your business! - {business_name}",
            ),
            builtin(
                "follow_up",
                "Follow Up",
                "General follow up after a visit or purchase",
                "Hi {customer_name}, thank you for choosing {business_name}. {message}",
            ),
        ]
    }
}

impl Entity<String> for Template {
    fn id(&self) -> String {
        self.id.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn vars(entries: &[(&str, &str)]) -> TemplateVariables {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn extracts_distinct_variables_in_order() {
        assert_eq!(
            extract_variables("{b} and {a} then {b} again {c_1}"),
            vec!["b", "a", "c_1"]
        );
        assert!(extract_variables("no placeholders here").is_empty());
        assert!(extract_variables("{not valid} {} {-x}").is_empty());
    }

    #[test]
    fn renders_known_and_keeps_unknown_placeholders() {
        let out = render("Hi {name}, you owe {amount}", &vars(&[("name", "Asha")]));
        assert_eq!(out, "Hi Asha, you owe {amount}");
    }

    #[test]
    fn render_replaces_every_occurrence_and_is_idempotent() {
        let body = "{name} {name} pays {amount}";
        let v = vars(&[("name", "Ravi"), ("amount", "500")]);
        let once = render(body, &v);
        assert_eq!(once, "Ravi Ravi pays 500");
        assert_eq!(render(&once, &v), once);
        for key in v.keys() {
            assert!(!once.contains(&format!("{{{}}}", key)));
        }
    }

    #[test]
    fn values_are_inserted_verbatim() {
        let out = render("Note: {x}", &vars(&[("x", "<b>{y}</b>")]));
        assert_eq!(out, "Note: <b>{y}</b>");
    }

    #[test]
    fn rejects_template_without_placeholders() {
        let res = Template::new(None, "Plain".into(), "".into(), "Hello there".into(), 0);
        assert_eq!(res.unwrap_err(), TemplateError::NoPlaceholders);
        let res = Template::new(None, "  ".into(), "".into(), "Hello {name}".into(), 0);
        assert_eq!(res.unwrap_err(), TemplateError::EmptyName);
    }

    #[test]
    fn strict_render_reports_missing_variables() {
        let template =
            Template::new(None, "T".into(), "".into(), "{a} {b} {c}".into(), 0).unwrap();
        let res = template.render(&vars(&[("b", "2")]));
        assert_eq!(
            res.unwrap_err(),
            TemplateError::MissingVariables(vec!["a".into(), "c".into()])
        );
        let res = template.render(&vars(&[("a", "1"), ("b", "2"), ("c", "3")]));
        assert_eq!(res.unwrap(), "1 2 3");
    }

    #[test]
    fn update_bumps_version_only_on_change() {
        let mut template =
            Template::new(None, "T".into(), "".into(), "Hi {name}".into(), 0).unwrap();
        template.update(None, None, None, 10).unwrap();
        assert_eq!(template.version, 1);
        template
            .update(None, None, Some("Hello {name}".into()), 20)
            .unwrap();
        assert_eq!(template.version, 2);
        assert_eq!(template.updated, 20);
        assert_eq!(
            template.update(None, None, Some("Hello".into()), 30),
            Err(TemplateError::NoPlaceholders)
        );
        assert_eq!(template.body, "Hello {name}");
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Template::builtin_catalog();
        assert!(!catalog.is_empty());
        for template in catalog {
            assert!(template.user_id.is_none());
            assert!(!template.variables().is_empty());
        }
    }

    #[test]
    fn visibility() {
        let owner = ID::new();
        let template =
            Template::new(Some(owner), "T".into(), "".into(), "{x}".into(), 0).unwrap();
        assert!(template.is_visible_to(&owner));
        assert!(!template.is_visible_to(&ID::new()));
        assert!(Template::builtin_catalog()[0].is_visible_to(&ID::new()));
    }
}
