use greentick_api::{Claims, Policy};
use greentick_sdk::{CreateCustomerInput, Customer, GreentickSDK, ID};
use jsonwebtoken::{encode, EncodingKey, Header};

pub fn create_token(secret: &str, user_id: ID, policy: Option<Policy>) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        exp: now + 60 * 60,
        iat: Some(now),
        user_id,
        policy,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("To encode token")
}

pub async fn create_customer(sdk: &GreentickSDK, phone: &str) -> Customer {
    sdk.customer
        .create(CreateCustomerInput {
            name: "Asha Kumar".into(),
            phone: phone.into(),
            notes: None,
        })
        .await
        .expect("To create customer")
        .customer
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
