use crate::store::Lead;
use serde::{Deserialize, Serialize};

/// JSON-safe projection of a [`Lead`], in the camelCase shape the browser
/// side consumes. `created_at` is the one lossy mapping: the timestamp is
/// normalized to an RFC 3339 string so the props round-trip through JSON
/// without type errors. Everything else copies losslessly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedLead {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub execution_hashid: Option<String>,
    pub created_at: String,
}

/// Pure projection step between the store row and the rendered props.
/// Absent in, absent out.
pub fn make_serializable(lead: Option<&Lead>) -> Option<SerializedLead> {
    lead.map(|lead| SerializedLead {
        id: lead.id,
        name: lead.name.clone(),
        email: lead.email.clone(),
        phone: lead.phone.clone(),
        execution_hashid: lead.execution_hashid.clone(),
        created_at: lead.created_at.to_rfc3339(),
    })
}
