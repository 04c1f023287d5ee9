use nu_websso::{Operation, WebSso, WebSsoError};

use crate::common::MockProvider;
use crate::common::mock_provider::MOCK_LOGOUT_URL;

#[tokio::test]
async fn test_gateway_login_url_standard() -> Result<(), Box<dyn std::error::Error>> {
    let provider = MockProvider::start().await;
    let websso = WebSso::new(provider.gateway_config())?;

    let url = websso.login_url(false, "https://app.example.edu/home").await?;

    assert!(url.contains("authIndexValue=ldap-registry"));
    assert!(url.contains("goto=https://app.example.edu/home"));

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path, "/agentless-websso/get-ldap-redirect-url");
    assert_eq!(request.header("goto"), Some("https://app.example.edu/home"));
    assert_eq!(request.header("apikey"), Some(crate::common::MOCK_API_KEY));
    assert_eq!(request.header("content-type"), Some("application/json"));
    Ok(())
}

#[tokio::test]
async fn test_gateway_login_url_with_duo() -> Result<(), Box<dyn std::error::Error>> {
    let provider = MockProvider::start().await;
    let websso = WebSso::new(provider.gateway_config())?;

    let url = websso.login_url(true, "https://app.example.edu/home").await?;

    assert!(url.contains("authIndexValue=ldap-and-duo"));
    assert_eq!(
        provider.requests()[0].path,
        "/agentless-websso/get-ldap-duo-redirect-url"
    );
    Ok(())
}

#[tokio::test]
async fn test_gateway_login_url_error_carries_status_and_body()
-> Result<(), Box<dyn std::error::Error>> {
    let provider = MockProvider::start().await;
    let mut config = provider.gateway_config();
    config.api_key = Some("wrong-key".to_string());
    let websso = WebSso::new(config)?;

    let err = websso
        .login_url(true, "https://app.example.edu/home")
        .await
        .expect_err("invalid api key is rejected");

    match &err {
        WebSsoError::Provider {
            operation,
            status,
            body,
        } => {
            assert_eq!(*operation, Operation::LoginUrl);
            assert_eq!(*status, 401);
            assert_eq!(body["fault"]["faultstring"], "Invalid ApiKey");
        }
        other => panic!("expected provider error, got {other:?}"),
    }
    assert_eq!(err.to_string(), "login URL lookup failed with status 401");
    Ok(())
}

#[tokio::test]
async fn test_gateway_logout_url() -> Result<(), Box<dyn std::error::Error>> {
    let provider = MockProvider::start().await;
    let websso = WebSso::new(provider.gateway_config())?;

    let url = websso.logout_url().await?;

    assert_eq!(url, MOCK_LOGOUT_URL);
    let requests = provider.requests();
    assert_eq!(requests[0].path, "/agentless-websso/logout");
    assert_eq!(requests[0].header("content-type"), Some("application/json"));
    assert_eq!(requests[0].header("apikey"), None);
    Ok(())
}

#[tokio::test]
async fn test_direct_login_url_makes_no_call() -> Result<(), Box<dyn std::error::Error>> {
    let provider = MockProvider::start().await;
    let websso = WebSso::new(provider.direct_config())?;

    let url = websso.login_url(true, "https://app/home").await?;

    assert_eq!(
        url,
        format!(
            "http://{}/nusso/XUI/?realm=northwestern#login&authIndexType=service&authIndexValue=ldap-and-duo&goto=https://app/home",
            provider.host
        )
    );
    assert!(provider.requests().is_empty());

    let err = websso.logout_url().await.expect_err("no logout URL");
    assert!(matches!(err, WebSsoError::Unsupported(Operation::LogoutUrl)));
    Ok(())
}
