//! Identity-provider webhook envelope builders.
//!
//! Payload shapes mirror the provider's delivery format: a top-level
//! `{"event": "...", "data": {...}}` envelope with snake_case data fields.

use serde_json::{Value, json};

pub fn user_created(auth_id: &str, email: &str, first: Option<&str>, last: Option<&str>) -> Value {
    json!({
        "event": "user.created",
        "data": {
            "id": auth_id,
            "email": email,
            "first_name": first,
            "last_name": last,
        }
    })
}

pub fn user_updated(auth_id: &str, email: &str, first: Option<&str>, last: Option<&str>) -> Value {
    json!({
        "event": "user.updated",
        "data": {
            "id": auth_id,
            "email": email,
            "first_name": first,
            "last_name": last,
        }
    })
}

pub fn user_deleted(auth_id: &str) -> Value {
    json!({
        "event": "user.deleted",
        "data": { "id": auth_id }
    })
}

pub fn organization_created(external_id: &str, name: &str) -> Value {
    json!({
        "event": "organization.created",
        "data": { "id": external_id, "name": name }
    })
}

pub fn organization_updated(external_id: &str, name: &str) -> Value {
    json!({
        "event": "organization.updated",
        "data": { "id": external_id, "name": name }
    })
}

pub fn organization_deleted(external_id: &str) -> Value {
    json!({
        "event": "organization.deleted",
        "data": { "id": external_id }
    })
}

pub fn membership_created(user_auth_id: &str, org_external_id: &str, role_slug: &str) -> Value {
    membership_event("organization_membership.created", user_auth_id, org_external_id, role_slug)
}

pub fn membership_updated(user_auth_id: &str, org_external_id: &str, role_slug: &str) -> Value {
    membership_event("organization_membership.updated", user_auth_id, org_external_id, role_slug)
}

pub fn membership_deleted(user_auth_id: &str, org_external_id: &str) -> Value {
    json!({
        "event": "organization_membership.deleted",
        "data": {
            "user_id": user_auth_id,
            "organization_id": org_external_id,
        }
    })
}

fn membership_event(event: &str, user_auth_id: &str, org_external_id: &str, role_slug: &str) -> Value {
    json!({
        "event": event,
        "data": {
            "user_id": user_auth_id,
            "organization_id": org_external_id,
            "role": { "slug": role_slug },
        }
    })
}
