
use runner::*;
use serde_json::json;
use sovereign_api::domain::{AccountStatus, AccountType};
use sovereign_api::token::{TokenPayload, TOKEN_LIFETIME_DAYS};
use sovereign_api::types::*;
use sovereign_client::client::Error as ClientError;

#[tokio::test]
async fn test_ping() {
    run_test(|client| async move {
        client.ping().await.expect("Ping query");
    })
    .await;
}

#[tokio::test]
async fn test_register_simple_flow() {
    run_test(|client| async move {
        let resp = client
            .register_simple(&RegisterSimpleRequest {
                email: "aboba@mail.com".to_owned(),
                password: "123456".to_owned(),
            })
            .await
            .expect("Signup");
        assert!(resp.success);
        assert!(!resp.token.is_empty());
        assert_eq!(resp.status, None);
        assert_eq!(resp.account_type, None);

        let status = client
            .user_status(&resp.token)
            .await
            .expect("Status query");
        assert_eq!(status.account_type, AccountType::Simple);
        assert_eq!(status.status, AccountStatus::Accepted);

        let whoami = client.whoami(&resp.token).await.expect("Whoami query");
        assert_eq!(whoami.payload.email, "aboba@mail.com");
        assert_eq!(whoami.payload.account_type, AccountType::Simple);
        assert_eq!(
            whoami.payload.exp - whoami.payload.iat,
            TOKEN_LIFETIME_DAYS * 24 * 60 * 60
        );
    })
    .await;
}

#[tokio::test]
async fn test_register_duplicate_rejected() {
    run_with_user(|env| async move {
        let res = env
            .client
            .register_simple(&RegisterSimpleRequest {
                email: env.email.clone(),
                password: "hunter2".to_owned(),
            })
            .await;
        let err = res.expect_err("Duplicate signup passed");
        assert_eq!(err.status(), Some(409));

        // The email is taken across tiers as well
        let res = env
            .client
            .register_premium(&RegisterPremiumRequest {
                email: env.email.clone(),
                password: "hunter2".to_owned(),
                full_name: "A. Boba".to_owned(),
                protocol_agreement: true,
            })
            .await;
        let err = res.expect_err("Premium signup over taken email passed");
        assert_eq!(err.status(), Some(409));

        // The original record is untouched
        let status = env
            .client
            .user_status(&env.token)
            .await
            .expect("Status query");
        assert_eq!(status.account_type, AccountType::Simple);
        assert_eq!(status.status, AccountStatus::Accepted);
    })
    .await;
}

#[tokio::test]
async fn test_register_missing_fields() {
    run_test(|client| async move {
        let res = client
            .register_simple(&RegisterSimpleRequest {
                email: "aboba@mail.com".to_owned(),
                password: "".to_owned(),
            })
            .await;
        match res.expect_err("Empty password passed") {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Missing fields");
            }
            e => panic!("Unexpected error: {e}"),
        }

        // Fields absent from the body entirely behave like empty ones
        let resp = client
            .client
            .post(format!("{}/register-simple", client.server))
            .json(&json!({ "email": "aboba@mail.com" }))
            .send()
            .await
            .expect("Request sent");
        assert_eq!(resp.status().as_u16(), 400);
        let body: serde_json::Value = resp.json().await.expect("JSON body");
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Missing fields"));

        let res = client
            .register_premium(&RegisterPremiumRequest {
                email: "buyer@mail.com".to_owned(),
                password: "123456".to_owned(),
                full_name: "".to_owned(),
                protocol_agreement: true,
            })
            .await;
        match res.expect_err("Empty full name passed") {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Missing fields");
            }
            e => panic!("Unexpected error: {e}"),
        }
    })
    .await;
}

#[tokio::test]
async fn test_premium_requires_agreement() {
    run_test(|client| async move {
        let res = client
            .register_premium(&RegisterPremiumRequest {
                email: "buyer@mail.com".to_owned(),
                password: "123456".to_owned(),
                full_name: "B. Uyer".to_owned(),
                protocol_agreement: false,
            })
            .await;
        match res.expect_err("Signup without agreement passed") {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Protocol not agreed");
            }
            e => panic!("Unexpected error: {e}"),
        }

        let resp = client
            .register_premium(&RegisterPremiumRequest {
                email: "buyer@mail.com".to_owned(),
                password: "123456".to_owned(),
                full_name: "B. Uyer".to_owned(),
                protocol_agreement: true,
            })
            .await
            .expect("Signup with agreement");
        assert!(resp.success);
    })
    .await;
}

#[tokio::test]
async fn test_premium_pending_flow() {
    run_test(|client| async move {
        let resp = client
            .register_premium(&RegisterPremiumRequest {
                email: "buyer@mail.com".to_owned(),
                password: "123456".to_owned(),
                full_name: "B. Uyer".to_owned(),
                protocol_agreement: true,
            })
            .await
            .expect("Signup");
        assert!(resp.success);
        assert_eq!(resp.status, AccountStatus::Pending);

        // Logging in works before approval, the token just reports Pending
        let login = client
            .login(&LoginRequest {
                email: "buyer@mail.com".to_owned(),
                password: "123456".to_owned(),
            })
            .await
            .expect("Login");
        assert!(!login.token.is_empty());
        assert_eq!(login.status, Some(AccountStatus::Pending));
        assert_eq!(login.account_type, None);

        let status = client
            .user_status(&login.token)
            .await
            .expect("Status query");
        assert_eq!(status.account_type, AccountType::Premium);
        assert_eq!(status.status, AccountStatus::Pending);
    })
    .await;
}

#[tokio::test]
async fn test_admin_approve_flow() {
    run_test(|client| async move {
        client
            .register_premium(&RegisterPremiumRequest {
                email: "buyer@mail.com".to_owned(),
                password: "123456".to_owned(),
                full_name: "B. Uyer".to_owned(),
                protocol_agreement: true,
            })
            .await
            .expect("Signup");
        let user_token = client
            .login(&LoginRequest {
                email: "buyer@mail.com".to_owned(),
                password: "123456".to_owned(),
            })
            .await
            .expect("Login")
            .token;

        let admin_token = admin_token(&client).await;
        let resp = client
            .approve_user(
                &admin_token,
                &ApproveUserRequest {
                    email: "buyer@mail.com".to_owned(),
                },
            )
            .await
            .expect("Approval");
        assert!(resp.success);
        assert_eq!(resp.status, AccountStatus::Accepted);

        // A token issued before approval sees the new status
        let status = client
            .user_status(&user_token)
            .await
            .expect("Status query");
        assert_eq!(status.status, AccountStatus::Accepted);

        // Approving twice is harmless
        let resp = client
            .approve_user(
                &admin_token,
                &ApproveUserRequest {
                    email: "buyer@mail.com".to_owned(),
                },
            )
            .await
            .expect("Second approval");
        assert_eq!(resp.status, AccountStatus::Accepted);
    })
    .await;
}

#[tokio::test]
async fn test_admin_login_root() {
    run_test(|client| async move {
        let resp = client
            .login(&LoginRequest {
                email: ADMIN_EMAIL.to_owned(),
                password: ADMIN_PASSWORD.to_owned(),
            })
            .await
            .expect("Admin login");
        assert!(resp.success);
        assert_eq!(resp.account_type, Some(AccountType::Root));
        assert_eq!(resp.status, None);

        // The administrator has no record in the store
        let status = client
            .user_status(&resp.token)
            .await
            .expect("Status query");
        assert_eq!(status.account_type, AccountType::Root);
        assert_eq!(status.status, AccountStatus::Unknown);

        let whoami = client.whoami(&resp.token).await.expect("Whoami query");
        assert_eq!(whoami.payload.email, ADMIN_EMAIL);
        assert_eq!(whoami.payload.account_type, AccountType::Root);

        // Wrong admin password falls through to the store and fails there
        let res = client
            .login(&LoginRequest {
                email: ADMIN_EMAIL.to_owned(),
                password: "wrong".to_owned(),
            })
            .await;
        let err = res.expect_err("Wrong admin password passed");
        assert_eq!(err.status(), Some(401));
    })
    .await;
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    run_with_user(|env| async move {
        let res = env
            .client
            .login(&LoginRequest {
                email: env.email.clone(),
                password: "wrong".to_owned(),
            })
            .await;
        let err = res.expect_err("Wrong password passed");
        assert_eq!(err.status(), Some(401));

        // Unknown emails are indistinguishable from wrong passwords
        let res = env
            .client
            .login(&LoginRequest {
                email: "ghost@mail.com".to_owned(),
                password: env.password.clone(),
            })
            .await;
        match res.expect_err("Unknown email passed") {
            ClientError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid credentials");
            }
            e => panic!("Unexpected error: {e}"),
        }

        let res = env
            .client
            .login(&LoginRequest {
                email: env.email.clone(),
                password: "".to_owned(),
            })
            .await;
        match res.expect_err("Empty password passed") {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Missing credentials");
            }
            e => panic!("Unexpected error: {e}"),
        }
    })
    .await;
}

#[tokio::test]
async fn test_invalid_tokens_rejected() {
    run_with_user(|env| async move {
        let res = env.client.user_status("garbage").await;
        match res.expect_err("Garbage token passed") {
            ClientError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid token");
            }
            e => panic!("Unexpected error: {e}"),
        }

        // Flipping one signature character invalidates the token
        let mut tampered = env.token.clone();
        let replacement = if tampered.ends_with('A') { 'B' } else { 'A' };
        tampered.pop();
        tampered.push(replacement);
        let res = env.client.user_status(&tampered).await;
        let err = res.expect_err("Tampered token passed");
        assert_eq!(err.status(), Some(401));

        // A well formed token signed with the right secret still fails once expired
        let mut payload = TokenPayload::new(&env.email, AccountType::Simple);
        payload.iat -= 7200;
        payload.exp = payload.iat + 3600;
        let expired = payload.encode(JWT_SECRET).expect("token encoded");
        let res = env.client.user_status(&expired).await;
        let err = res.expect_err("Expired token passed");
        assert_eq!(err.status(), Some(401));

        // No Authorization header at all
        let resp = env
            .client
            .client
            .get(format!("{}/whoami", env.client.server))
            .send()
            .await
            .expect("Request sent");
        assert_eq!(resp.status().as_u16(), 401);
        let body: serde_json::Value = resp.json().await.expect("JSON body");
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Missing token"));
    })
    .await;
}

#[tokio::test]
async fn test_approve_requires_admin() {
    run_with_user(|env| async move {
        env.client
            .register_premium(&RegisterPremiumRequest {
                email: "buyer@mail.com".to_owned(),
                password: "123456".to_owned(),
                full_name: "B. Uyer".to_owned(),
                protocol_agreement: true,
            })
            .await
            .expect("Signup");

        let res = env
            .client
            .approve_user(
                &env.token,
                &ApproveUserRequest {
                    email: "buyer@mail.com".to_owned(),
                },
            )
            .await;
        match res.expect_err("Approval by a regular user passed") {
            ClientError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Not authorized");
            }
            e => panic!("Unexpected error: {e}"),
        }

        // The target is still waiting
        let login = env
            .client
            .login(&LoginRequest {
                email: "buyer@mail.com".to_owned(),
                password: "123456".to_owned(),
            })
            .await
            .expect("Login");
        assert_eq!(login.status, Some(AccountStatus::Pending));
    })
    .await;
}

#[tokio::test]
async fn test_approve_unknown_user() {
    run_test(|client| async move {
        let admin_token = admin_token(&client).await;
        let res = client
            .approve_user(
                &admin_token,
                &ApproveUserRequest {
                    email: "ghost@mail.com".to_owned(),
                },
            )
            .await;
        match res.expect_err("Approval of unknown email passed") {
            ClientError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "User not found");
            }
            e => panic!("Unexpected error: {e}"),
        }
    })
    .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_single_winner() {
    run_test(|client| async move {
        let mut handles = Vec::new();
        for i in 0..8 {
            let client = client.clone();
            handles.push(tokio::spawn(async move {
                client
                    .register_simple(&RegisterSimpleRequest {
                        email: "aboba@mail.com".to_owned(),
                        password: format!("pass-{i}"),
                    })
                    .await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            match handle.await.expect("Task joined") {
                Ok(resp) => {
                    assert!(resp.success);
                    winners += 1;
                }
                Err(err) => assert_eq!(err.status(), Some(409)),
            }
        }
        assert_eq!(winners, 1, "Exactly one signup takes the email");
    })
    .await;
}

#[tokio::test]
async fn test_unknown_route_not_found() {
    run_test(|client| async move {
        let resp = client
            .client
            .get(format!("{}/definitely-not-a-route", client.server))
            .send()
            .await
            .expect("Request sent");
        assert_eq!(resp.status().as_u16(), 404);
        let body = resp.text().await.expect("Body text");
        assert_eq!(body, "Not found");
    })
    .await;
}
