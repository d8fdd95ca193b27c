//! Page Route
//!
//! - GET / - The chart page
//!
//! The dataset is loaded once per page load and the chart is rendered
//! server-side at the default viewport. The dataset is then held under a
//! page token; the embedded script opens `/ws?page=<token>`, mounts the
//! chart at the real viewport and swaps in each redraw.

use axum::{extract::State, http::StatusCode, response::Html};
use quick_xml::escape::escape;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::chart::render_svg;
use crate::config::ChartConfig;
use crate::source::SourceError;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; }
.container { display: flex; flex-direction: column; align-items: center; }
#title { margin: 1rem 0; }
#chart-container { margin: auto; }
.bar:hover { fill: #f80; }
.banner { padding: 1rem 2rem; border-radius: 4px; background: #fee; color: #900; }
.banner.empty { background: #eef; color: #334; }
#tooltip { position: fixed; display: none; pointer-events: none; padding: 0.5rem;
  background: rgba(255, 255, 255, 0.9); border: 1px solid #888; border-radius: 4px;
  font-size: 0.8rem; white-space: pre; }
"#;

const SCRIPT: &str = r#"
(function () {
  var chart = document.getElementById('chart-container');
  var tip = document.getElementById('tooltip');
  var scheme = location.protocol === 'https:' ? 'wss://' : 'ws://';
  var page = encodeURIComponent(chart.dataset.page);
  var ws = new WebSocket(scheme + location.host + '/ws?page=' + page);
  function report(type) {
    ws.send(JSON.stringify({ type: type, width: window.innerWidth, height: window.innerHeight }));
  }
  ws.onopen = function () { report('mount'); };
  ws.onmessage = function (event) {
    var msg = JSON.parse(event.data);
    if (msg.type === 'redraw') { chart.innerHTML = msg.svg; }
  };
  window.addEventListener('resize', function () {
    if (ws.readyState === WebSocket.OPEN) { report('resize'); }
  });

  function place(bar, event) {
    var box = tip.getBoundingClientRect();
    var x = event.clientX, y = event.clientY;
    switch (bar.dataset.tooltipPlacement) {
      case 'right': x += 12; y -= box.height / 2; break;
      case 'top': x -= box.width / 2; y -= box.height + 12; break;
      case 'bottom': x -= box.width / 2; y += 12; break;
      default: x -= box.width + 12; y -= box.height / 2;
    }
    tip.style.left = x + 'px';
    tip.style.top = y + 'px';
  }
  chart.addEventListener('mouseover', function (event) {
    var bar = event.target.closest('rect.bar');
    if (!bar) { return; }
    var title = bar.querySelector('title');
    tip.textContent = title ? title.textContent : '';
    tip.style.display = 'block';
    place(bar, event);
  });
  chart.addEventListener('mousemove', function (event) {
    var bar = event.target.closest('rect.bar');
    if (bar && bar.dataset.tooltipFollow === 'true') { place(bar, event); }
  });
  chart.addEventListener('mouseout', function (event) {
    if (event.target.closest('rect.bar')) { tip.style.display = 'none'; }
  });
})();
"#;

/// GET /
///
/// Loader and render failures become an in-page banner with a matching
/// status code instead of a bare error response.
pub async fn index(State(state): State<Arc<AppState>>) -> (StatusCode, Html<String>) {
    let config = &state.config.chart;

    let dataset = match state.source.fetch().await {
        Ok(dataset) => dataset,
        Err(SourceError::EmptyDataset) => {
            tracing::warn!(source = %state.source.describe(), "Upstream returned no data");
            let body = banner("empty", "No data available.");
            return (StatusCode::OK, Html(page(config, &body, None)));
        }
        Err(e) => {
            let err = ApiError::from(e);
            let (status, code) = err.status_and_code();
            tracing::error!(error = %err, error_code = code, "Failed to load dataset");
            let body = banner("error", &format!("Could not load GDP data: {}", err));
            return (status, Html(page(config, &body, None)));
        }
    };

    match render_svg(&dataset, config, state.default_viewport()) {
        Ok(svg) => {
            let token = state.pages.insert(dataset);
            (StatusCode::OK, Html(page(config, &svg, Some(&token))))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to render chart");
            let body = banner("error", &format!("Could not render chart: {}", e));
            (StatusCode::INTERNAL_SERVER_ERROR, Html(page(config, &body, None)))
        }
    }
}

fn banner(kind: &str, message: &str) -> String {
    format!(
        r#"<div class="banner {}" role="alert">{}</div>"#,
        kind,
        escape(message)
    )
}

/// Full HTML document around `content`; a page token enables resize redraws
fn page(config: &ChartConfig, content: &str, token: Option<&str>) -> String {
    let (page_attr, script) = match token {
        Some(token) => (
            format!(r#" data-page="{}""#, escape(token)),
            format!(r#"<div id="tooltip" role="tooltip"></div><script>{}</script>"#, SCRIPT),
        ),
        None => (String::new(), String::new()),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<div class="container">
<h1 id="title">{title}</h1>
<div id="chart-container"{page_attr} style="width: {width}; height: {height};">{content}</div>
</div>
{script}
</body>
</html>
"#,
        title = escape(config.title.as_str()),
        style = STYLE,
        width = config.width,
        height = config.height,
        page_attr = page_attr,
        content = content,
        script = script,
    )
}
