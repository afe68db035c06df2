//! HTML consent page for the authorization endpoint.

/// Render the consent page shown before an authorization code is issued.
///
/// All parameters are HTML-escaped to prevent XSS. The hidden fields
/// carry the authorization parameters back through the form POST.
#[must_use]
pub fn render_consent_page(
    client_name: &str,
    client_id: &str,
    redirect_uri: &str,
    state: &str,
    code_challenge: &str,
    code_challenge_method: &str,
    scope: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width,initial-scale=1">
<title>Authorize - MCP Remote Access</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; background: #f5f5f5; margin: 0; display: flex; justify-content: center; align-items: center; min-height: 100vh; }}
.card {{ background: #fff; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.1); padding: 32px; max-width: 400px; width: 100%; }}
h1 {{ font-size: 20px; margin: 0 0 8px; color: #333; }}
.subtitle {{ color: #666; font-size: 14px; margin: 0 0 8px; }}
.hint {{ color: #999; font-size: 13px; margin: 0 0 24px; }}
.buttons {{ display: flex; gap: 8px; }}
button {{ flex: 1; padding: 10px; border: none; border-radius: 4px; font-size: 14px; font-weight: 500; cursor: pointer; }}
.approve {{ background: #0066cc; color: #fff; }}
.approve:hover {{ background: #0052a3; }}
.deny {{ background: #eee; color: #333; }}
.deny:hover {{ background: #ddd; }}
</style>
</head>
<body>
<div class="card">
<h1>MCP Remote Access</h1>
<p class="subtitle"><strong>{client_name}</strong> is requesting access to scope <strong>{scope_label}</strong></p>
<p class="hint">Only approve if you initiated this connection.</p>
<form method="POST" action="/authorize">
<input type="hidden" name="client_id" value="{client_id_escaped}">
<input type="hidden" name="redirect_uri" value="{redirect_uri_escaped}">
<input type="hidden" name="state" value="{state_escaped}">
<input type="hidden" name="code_challenge" value="{code_challenge_escaped}">
<input type="hidden" name="code_challenge_method" value="{method_escaped}">
<input type="hidden" name="scope" value="{scope_escaped}">
<div class="buttons">
<button type="submit" name="action" value="approve" class="approve">Approve</button>
<button type="submit" name="action" value="deny" class="deny">Deny</button>
</div>
</form>
</div>
</body>
</html>"#,
        client_name = html_escape(client_name),
        scope_label = html_escape(scope),
        client_id_escaped = html_escape(client_id),
        redirect_uri_escaped = html_escape(redirect_uri),
        state_escaped = html_escape(state),
        code_challenge_escaped = html_escape(code_challenge),
        method_escaped = html_escape(code_challenge_method),
        scope_escaped = html_escape(scope),
    )
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
