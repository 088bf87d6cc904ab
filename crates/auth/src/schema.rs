//! Self-describing schema for the token endpoint

use serde_json::{json, Value};

/// JSON schema of the token response, returned by `OPTIONS {api_prefix}/token`
pub fn token_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-04/schema#",
        "title": "token",
        "type": "object",
        "properties": {
            "access_token": {
                "description": "Signed bearer token for the authenticated user.",
                "type": "string",
                "readonly": true
            },
            "data": {
                "description": "Full claims carried by the token. The user is at data.data.user.",
                "type": "object",
                "readonly": true,
                "properties": {
                    "iss": { "type": "string" },
                    "iat": { "type": "integer" },
                    "nbf": { "type": "integer" },
                    "exp": { "type": "integer" },
                    "data": {
                        "type": "object",
                        "properties": {
                            "user": {
                                "type": "object",
                                "properties": {
                                    "id": { "type": "integer" },
                                    "type": { "type": "string" },
                                    "user_login": { "type": "string" },
                                    "user_email": { "type": "string" }
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}
