// User account scenario: sign up, log in, read and update settings
use anyhow::{ensure, Context as _, Result};
use futures::future::BoxFuture;

use crate::api::client::{NewUser, UserSettings};
use crate::cases::assert::{expect_data_str, expect_ok, require_data_str};
use crate::cases::{Context, StateKey};

pub const USER1_EMAIL: &str = "test@test.com";
pub const USER1_PASSWORD: &str = "pwd123456";
pub const USER1_TIME_ZONE: &str = "Asia/Shanghai";
pub const USER1_LANGUAGE: &str = "en-US";

pub const UPDATED_TIME_ZONE: &str = "Australia/Melbourne";
pub const UPDATED_LANGUAGE: &str = "zh-Hans";

/// Request a verification code, read it from the database and create the user
pub fn register_user(c: &mut Context) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let resp = c.service.get_verification(USER1_EMAIL).await?;
        expect_ok(&resp)?;

        let code = c
            .db
            .fetch_verification_code(USER1_EMAIL)
            .await
            .context("verification code was not stored")?;
        ensure!(!code.is_empty(), "verification code for {} is empty", USER1_EMAIL);
        println!("verification code: {}", code);

        let resp = c
            .service
            .create_user(&NewUser {
                email: USER1_EMAIL,
                verification: &code,
                password: USER1_PASSWORD,
                time_zone: Some(USER1_TIME_ZONE),
                language: Some(USER1_LANGUAGE),
            })
            .await?;
        expect_ok(&resp)?;

        c.state.set(StateKey::UserEmail, USER1_EMAIL);
        c.state.set(StateKey::UserPassword, USER1_PASSWORD);
        Ok(())
    })
}

pub fn login_user(c: &mut Context) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let email = c.state.require(StateKey::UserEmail)?.to_string();
        let password = c.state.require(StateKey::UserPassword)?.to_string();

        let resp = c.service.login(&email, &password).await?;
        println!("{}", resp);
        expect_ok(&resp)?;

        let token = require_data_str(&resp, "token")?.to_string();
        c.state.set(StateKey::UserToken, token);
        Ok(())
    })
}

/// Settings supplied at registration come back from the info endpoint
pub fn user_info(c: &mut Context) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let token = c.state.require(StateKey::UserToken)?;

        let resp = c.service.user_info(token).await?;
        println!("{}", resp);
        expect_ok(&resp)?;
        expect_data_str(&resp, "language", USER1_LANGUAGE)?;
        expect_data_str(&resp, "timeZone", USER1_TIME_ZONE)?;
        Ok(())
    })
}

/// Update time zone and language in separate requests; neither update may
/// clobber the other field
pub fn update_user_setting(c: &mut Context) -> BoxFuture<'_, Result<()>> {
    Box::pin(async move {
        let token = c.state.require(StateKey::UserToken)?;

        let updates = [
            UserSettings {
                time_zone: Some(UPDATED_TIME_ZONE),
                ..Default::default()
            },
            UserSettings {
                language: Some(UPDATED_LANGUAGE),
                ..Default::default()
            },
        ];
        for update in updates {
            let resp = c.service.update_user(token, update).await?;
            println!("{}", resp);
            expect_ok(&resp)?;
        }

        let resp = c.service.user_info(token).await?;
        println!("{}", resp);
        expect_ok(&resp)?;
        expect_data_str(&resp, "language", UPDATED_LANGUAGE)?;
        expect_data_str(&resp, "timeZone", UPDATED_TIME_ZONE)?;
        Ok(())
    })
}
