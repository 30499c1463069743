use mygram_types::api::{
    AddPhotoRequest, AddSocialMediaRequest, RegisterRequest, UpdateUserRequest,
};

use crate::error::{Result, ServiceError};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_AGE: u32 = 8;

pub fn register(req: &RegisterRequest) -> Result<()> {
    required("username", &req.username)?;
    email(&req.email)?;
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if req.age < MIN_AGE {
        return Err(invalid(format!("age must be at least {MIN_AGE}")));
    }
    Ok(())
}

pub fn update_user(req: &UpdateUserRequest) -> Result<()> {
    required("username", &req.username)?;
    email(&req.email)
}

pub fn photo(req: &AddPhotoRequest) -> Result<()> {
    required("title", &req.title)?;
    required("photo_url", &req.photo_url)
}

pub fn message(message: &str) -> Result<()> {
    required("message", message)
}

pub fn social_media(req: &AddSocialMediaRequest) -> Result<()> {
    required("name", &req.name)?;
    required("social_media_url", &req.social_media_url)
}

fn required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(format!("{field} is required")));
    }
    Ok(())
}

fn email(value: &str) -> Result<()> {
    required("email", value)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(invalid("email is not a valid address".to_string()));
    }
    Ok(())
}

fn invalid(msg: String) -> ServiceError {
    ServiceError::Validation(msg)
}
