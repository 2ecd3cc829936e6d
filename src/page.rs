use crate::serialize::{SerializedLead, make_serializable};
use crate::store::{LeadStore, StoreError};
use crate::token::{AuthExchangeError, TokenExchanger};
use serde::Serialize;
use thiserror::Error;

pub const EWF_CDN_SCRIPT_URL: &str = "https://cdn.ewf.to/ewf-0033.js";
pub const EWF_CDN_STYLESHEET_URL: &str = "https://cdn.ewf.to/ewf-0033.css";

#[derive(Debug, Error)]
pub enum PageError {
    #[error("no lead with id {0}")]
    NotFound(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    AuthExchange(#[from] AuthExchangeError),
}

/// Props embedded into the rendered document and consumed by the widget
/// loader script. The server-side secret is deliberately absent; the public
/// key and the short-lived user token are the only credentials that reach
/// the browser.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPageProps {
    pub lead: SerializedLead,
    pub user_token: String,
    pub public_key: String,
}

/// Data-preparation step for one page view: lead lookup and token exchange
/// have no data dependency, so they run concurrently. A missing lead is a
/// 404, not an empty render.
pub async fn prepare_props(
    store: &dyn LeadStore,
    tokens: &dyn TokenExchanger,
    public_key: &str,
    lead_id: i64,
) -> Result<LeadPageProps, PageError> {
    let (lead, user_token) = tokio::try_join!(
        async { store.find_by_id(lead_id).await.map_err(PageError::from) },
        async { tokens.user_token().await.map_err(PageError::from) },
    )?;

    let lead = make_serializable(lead.as_ref()).ok_or(PageError::NotFound(lead_id))?;
    Ok(LeadPageProps {
        lead,
        user_token,
        public_key: public_key.to_string(),
    })
}

/// Server-rendered lead detail document. Props travel to the browser as a
/// JSON script element; the loader script at /assets/widget-loader.js picks
/// them up after first paint. The execution viewer container is emitted only
/// when the lead is tied to a workflow run.
pub fn render_lead_page(props: &LeadPageProps) -> String {
    let lead = &props.lead;
    // "</" must not appear literally inside the inline JSON script element;
    // the JSON escape for '/' keeps the payload equivalent.
    let props_json = serde_json::to_string(props)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");

    let viewer = match &lead.execution_hashid {
        Some(hashid) => format!(
            r#"    <link rel="stylesheet" media="screen" href="{EWF_CDN_STYLESHEET_URL}">
    <div class="EWF__execution_viewer" data-hashid="{}"></div>
"#,
            escape_html(hashid)
        ),
        None => String::new(),
    };

    format!(
        r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <title>Lead · {name}</title>
</head>
<body>
  <main>
    <h1>Lead</h1>
    <p>Information for {name}.</p>
    <table>
      <thead>
        <tr><th>Name</th><th>Email</th><th>Phone</th></tr>
      </thead>
      <tbody>
        <tr><td>{name}</td><td>{email}</td><td>{phone}</td></tr>
      </tbody>
    </table>
{viewer}  </main>
  <script type="application/json" id="__LEAD_PROPS__">{props_json}</script>
  <script src="/assets/widget-loader.js" defer></script>
</body>
</html>
"#,
        name = escape_html(&lead.name),
        email = escape_html(&lead.email),
        phone = escape_html(&lead.phone),
    )
}

/// Minimal HTML error page; bodies carry the public status text only.
pub fn render_error_page(title: &str, message: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body><main><h1>{title}</h1><p>{message}</p></main></body>
</html>
"#,
        title = escape_html(title),
        message = escape_html(message),
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
