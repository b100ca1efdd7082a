mod helpers;

use greentick_api::{Permission, Policy};
use greentick_sdk::{
    APIErrorVariant, CreateCustomerInput, GetCustomersInput, GreentickSDK, UpdateCustomerInput,
    ID,
};
use helpers::setup::spawn_app;
use helpers::utils::{create_customer, create_token};

#[actix_web::main]
#[test]
async fn test_status_ok() {
    let (_, sdk) = spawn_app().await;
    assert!(sdk.status.check_health().await.is_ok());
}

#[actix_web::main]
#[test]
async fn test_routes_require_token() {
    let (app, sdk) = spawn_app().await;
    let res = sdk.customer.list(GetCustomersInput::default()).await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::Unauthorized);

    let forged = GreentickSDK::new(
        app.address.clone(),
        create_token("some other secret", ID::new(), None),
    );
    let res = forged.customer.list(GetCustomersInput::default()).await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::Unauthorized);
}

#[actix_web::main]
#[test]
async fn test_crud_customer() {
    let (app, _) = spawn_app().await;
    let (user_id, sdk) = app.new_user();

    let customer = create_customer(&sdk, "+91 98765-43210").await;
    assert_eq!(customer.user_id, user_id);
    assert_eq!(customer.phone, "+919876543210");

    let res = sdk
        .customer
        .create(CreateCustomerInput {
            name: "Someone else".into(),
            phone: "+919876543210".into(),
            notes: None,
        })
        .await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::Conflict);

    let res = sdk
        .customer
        .create(CreateCustomerInput {
            name: "   ".into(),
            phone: "+919876543211".into(),
            notes: None,
        })
        .await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::BadClientData);

    let updated = sdk
        .customer
        .update(UpdateCustomerInput {
            customer_id: customer.id,
            name: None,
            phone: None,
            notes: Some("Visits on Fridays".into()),
        })
        .await
        .expect("To update customer")
        .customer;
    assert_eq!(updated.notes.as_deref(), Some("Visits on Fridays"));
    assert_eq!(updated.name, customer.name);

    let customers = sdk
        .customer
        .list(GetCustomersInput::default())
        .await
        .expect("To list customers")
        .customers;
    assert_eq!(customers.len(), 1);

    // Other users can not see the customer
    let (_, other_sdk) = app.new_user();
    let res = other_sdk.customer.get(customer.id).await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::NotFound);
    let customers = other_sdk
        .customer
        .list(GetCustomersInput::default())
        .await
        .expect("To list customers")
        .customers;
    assert!(customers.is_empty());

    let deleted = sdk
        .customer
        .delete(customer.id)
        .await
        .expect("To delete customer");
    assert_eq!(deleted.customer.id, customer.id);
    let res = sdk.customer.get(customer.id).await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::NotFound);
}

#[actix_web::main]
#[test]
async fn test_policy_restricts_actions() {
    let (app, _) = spawn_app().await;
    let policy = Policy::new(
        Some(vec![Permission::All]),
        Some(vec![Permission::DeleteCustomer]),
    );
    let sdk = GreentickSDK::new(
        app.address.clone(),
        create_token(&app.config.jwt_secret, ID::new(), Some(policy)),
    );

    let customer = create_customer(&sdk, "+919876543210").await;
    let res = sdk.customer.delete(customer.id).await;
    assert_eq!(res.unwrap_err().variant, APIErrorVariant::Unauthorized);
    assert!(sdk.customer.get(customer.id).await.is_ok());
}
