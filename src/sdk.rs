use crate::page::EWF_CDN_SCRIPT_URL;

/// Browser half of the page renderer: a one-shot loader for the EmbedWorkflow
/// CDN script. The acquisition has explicit outcomes (loaded, failed) instead
/// of an unguarded onload callback; on failure the viewer container gets a
/// visible message rather than staying silently empty. `EWF` is an opaque
/// global owned by the vendor script.
pub fn widget_loader_script() -> String {
    format!(
        r#"// EmbedWorkflow widget loader
(function () {{
  var propsEl = document.getElementById("__LEAD_PROPS__");
  if (!propsEl) return;

  var props;
  try {{
    props = JSON.parse(propsEl.textContent);
  }} catch (err) {{
    console.warn("leadflow: unreadable page props", err);
    return;
  }}

  var state = "loading";

  function fail(reason) {{
    if (state === "done") return;
    state = "done";
    console.warn("leadflow: workflow widget unavailable:", reason);
    var viewer = document.querySelector(".EWF__execution_viewer");
    if (viewer) {{
      viewer.textContent = "Workflow viewer failed to load.";
    }}
  }}

  var script = document.createElement("script");
  script.src = "{EWF_CDN_SCRIPT_URL}";
  script.onload = function () {{
    if (state === "done") return;
    if (typeof EWF === "undefined") {{
      fail("script loaded but EWF global missing");
      return;
    }}
    state = "done";
    EWF.load(props.publicKey, {{ userToken: props.userToken }});
  }};
  script.onerror = function () {{
    fail("script failed to load");
  }};
  document.body.appendChild(script);
}})();
"#
    )
}
