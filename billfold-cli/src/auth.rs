use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};

use billfold_core::Identity;

use crate::config;
use crate::state::ensure_billfold_home;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthState {
    pub vision_api_key: Option<String>,
    pub access_token: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

/// The session IS the identity capability: a user id counts only while an
/// access token is also present.
impl Identity for AuthState {
    fn current_user(&self) -> Option<String> {
        match (&self.access_token, &self.user_id) {
            (Some(_), Some(id)) => Some(id.clone()),
            _ => None,
        }
    }
}

fn auth_path() -> Result<std::path::PathBuf> {
    Ok(ensure_billfold_home()?.join("auth.json"))
}

pub fn load_auth() -> Result<AuthState> {
    let p = auth_path()?;
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}

pub fn save_auth(auth: &AuthState) -> Result<()> {
    let p = auth_path()?;
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn paste_vision_key() -> Result<()> {
    let mut auth = load_auth()?;
    let key = prompt_line("Paste vision API key (starts with AIza)")?;
    if !key.starts_with("AIza") {
        bail!("key didn't look like a Google API key (expected prefix AIza)");
    }
    auth.vision_api_key = Some(key);
    save_auth(&auth)?;
    println!("Saved vision API key to ~/.billfold/auth.json");
    Ok(())
}

/// Password-grant sign-in against the store's auth endpoint. Stores the
/// access token and user id for later owner-scoped calls.
pub async fn login(email: Option<String>) -> Result<()> {
    let cfg = config::load_config()?;
    if cfg.store.api_key.is_empty() {
        bail!("store api_key is empty; run: billfold config init, then edit ~/.billfold/config.toml");
    }

    let email = match email {
        Some(e) => e,
        None => prompt_line("Email")?,
    };
    let password = prompt_line("Password")?;

    #[derive(Serialize)]
    struct Req {
        email: String,
        password: String,
    }

    #[derive(Deserialize)]
    struct Resp {
        access_token: String,
        user: RespUser,
    }

    #[derive(Deserialize)]
    struct RespUser {
        id: String,
    }

    let url = format!(
        "{}/auth/v1/token?grant_type=password",
        cfg.store.base_url.trim_end_matches('/')
    );

    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .header("apikey", &cfg.store.api_key)
        .json(&Req {
            email: email.clone(),
            password,
        })
        .send()
        .await
        .context("sign-in request")?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("sign-in failed: {status} {txt}");
    }

    let out: Resp = resp.json().await.context("parse sign-in response")?;

    let mut auth = load_auth()?;
    auth.access_token = Some(out.access_token);
    auth.user_id = Some(out.user.id);
    auth.email = Some(email);
    save_auth(&auth)?;
    println!("Signed in. Session saved to ~/.billfold/auth.json");
    Ok(())
}

pub fn logout() -> Result<()> {
    let mut auth = load_auth()?;
    auth.access_token = None;
    auth.user_id = None;
    save_auth(&auth)?;
    println!("Signed out.");
    Ok(())
}

pub fn status() -> Result<()> {
    let auth = load_auth()?;
    match auth.current_user() {
        Some(id) => println!(
            "Signed in as {} ({})",
            auth.email.as_deref().unwrap_or("<unknown>"),
            id
        ),
        None => println!("Not signed in. Run: billfold auth login"),
    }
    match auth.vision_api_key {
        Some(_) => println!("Vision API key: set"),
        None => println!("Vision API key: missing (billfold auth paste-vision-key)"),
    }
    Ok(())
}
