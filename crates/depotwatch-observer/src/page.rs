//! Dashboard page rendering via `minijinja`.
//!
//! The page is one HTML template with auto-escaping on. Slot values are
//! escaped on the way in; the inline stylesheet and script are passed as
//! safe strings.

use depotwatch_types::DisplaySlots;
use minijinja::value::Value;
use minijinja::{Environment, context};

use crate::error::ObserverError;

/// The `.html` suffix turns on HTML auto-escaping.
const INDEX_NAME: &str = "index.html";

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Depotwatch</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>{{ style }}</style>
</head>
<body>
    <header>
        <h1>Depotwatch</h1>
        <span id="current-time" class="clock">{{ display.current_time }}</span>
    </header>

    <section class="slots">
        <div class="metric">
            <div class="label">Vehicle</div>
            <div id="vehicle-plate" class="value">{{ display.vehicle_plate }}</div>
            <div class="label">Confidence <span id="confidence">{{ display.confidence }}</span></div>
        </div>
        <div class="metric">
            <div class="label">Goods loaded</div>
            <div id="goods-counter" class="value">{{ display.goods_counter }}</div>
        </div>
        <img id="snapshot" src="{{ display.snapshot_url }}" alt="Gate snapshot" width="300" height="200">
    </section>

    <section class="charts">
        <div class="chart"><canvas id="goods-chart"></canvas></div>
        <div class="chart"><canvas id="vehicles-chart"></canvas></div>
    </section>

    <section class="panel">
        <h2>Event log</h2>
        <div id="event-log"></div>
    </section>

    <section class="panel">
        <h2>Assistant</h2>
        <button id="briefing-button">Shift briefing</button>
        <button id="anomaly-button">Review log</button>
        <span id="briefing-loader" class="loader hidden">Thinking...</span>
        <pre id="briefing-output"></pre>
    </section>

    <script>{{ script }}</script>
</body>
</html>"#;

const PAGE_STYLE: &str = r"
body { background: #111827; color: #d1d5db; font-family: 'Fira Code', 'Consolas', monospace; padding: 2rem; max-width: 1100px; margin: 0 auto; }
header { display: flex; justify-content: space-between; align-items: baseline; }
h1 { color: #34d399; margin: 0; }
h2 { color: #9ca3af; font-size: 1rem; }
.clock { font-size: 1.5rem; color: #34d399; }
.slots, .charts { display: flex; gap: 1rem; margin-top: 1rem; }
.metric { background: #1f2937; border: 1px solid #374151; border-radius: 6px; padding: 1rem 1.5rem; min-width: 180px; }
.metric .label { color: #9ca3af; font-size: 0.85rem; }
.metric .value { color: #34d399; font-size: 1.5rem; font-weight: bold; }
.chart { flex: 1; height: 220px; background: #1f2937; border-radius: 6px; padding: 0.5rem; }
.panel { background: #1f2937; border-radius: 6px; padding: 1rem; margin-top: 1rem; }
#event-log { max-height: 320px; overflow-y: auto; }
.text-blue-300 { color: #93c5fd; }
.text-green-300 { color: #86efac; }
.p-1 { padding: 0.25rem; }
button { background: #059669; color: white; border: none; border-radius: 4px; padding: 0.5rem 1rem; cursor: pointer; }
button:disabled { background: #4b5563; cursor: not-allowed; }
.loader.hidden { display: none; }
pre { white-space: pre-wrap; }
";

const PAGE_SCRIPT: &str = r"
const charts = {};

function chartConfig(view) {
    return {
        type: view.style.chart_type,
        data: {
            labels: view.labels,
            datasets: [{
                label: view.label,
                data: view.values,
                borderColor: view.style.border_color,
                backgroundColor: view.style.background_color,
                borderWidth: view.style.border_width,
                tension: view.style.tension,
                fill: true,
            }],
        },
        options: {
            maintainAspectRatio: view.style.maintain_aspect_ratio,
            plugins: { legend: { display: view.style.legend_display } },
            scales: { y: { beginAtZero: view.style.begin_at_zero } },
        },
    };
}

function renderChart(id, view) {
    const existing = charts[id];
    if (!existing) {
        charts[id] = { chart: new Chart(document.getElementById(id), chartConfig(view)), revision: view.revision };
        return;
    }
    if (existing.revision === view.revision) return;
    existing.chart.data.labels = view.labels;
    existing.chart.data.datasets[0].data = view.values;
    existing.chart.update();
    existing.revision = view.revision;
}

function renderLog(rows) {
    const log = document.getElementById('event-log');
    log.replaceChildren(...rows.map((row) => {
        const p = document.createElement('p');
        p.className = row.class;
        p.textContent = row.text;
        return p;
    }));
}

function renderSnapshot(s) {
    document.getElementById('current-time').textContent = s.display.current_time;
    document.getElementById('vehicle-plate').textContent = s.display.vehicle_plate;
    document.getElementById('goods-counter').textContent = s.display.goods_counter;
    document.getElementById('confidence').textContent = s.display.confidence;
    const img = document.getElementById('snapshot');
    if (img.getAttribute('src') !== s.display.snapshot_url) img.src = s.display.snapshot_url;
    renderLog(s.log);
    renderChart('goods-chart', s.goods_chart);
    renderChart('vehicles-chart', s.vehicles_chart);
}

function renderPanel(panel) {
    document.getElementById('briefing-loader').classList.toggle('hidden', !panel.busy);
    document.getElementById('briefing-output').textContent = panel.output;
    document.getElementById('briefing-button').disabled = !panel.controls_enabled;
    document.getElementById('anomaly-button').disabled = !panel.controls_enabled;
}

async function trigger(path) {
    renderPanel({ busy: true, output: '', controls_enabled: false });
    try {
        const res = await fetch(path, { method: 'POST' });
        const body = await res.json();
        if (body.panel) renderPanel(body.panel);
    } finally {
        const res = await fetch('/api/briefing');
        renderPanel(await res.json());
    }
}

document.getElementById('briefing-button').onclick = () => trigger('/api/briefing');
document.getElementById('anomaly-button').onclick = () => trigger('/api/anomaly-review');

fetch('/api/dashboard').then((r) => r.json()).then(renderSnapshot);
fetch('/api/briefing').then((r) => r.json()).then(renderPanel);

function connect() {
    const proto = location.protocol === 'https:' ? 'wss' : 'ws';
    const ws = new WebSocket(`${proto}://${location.host}/ws/dashboard`);
    ws.onmessage = (msg) => renderSnapshot(JSON.parse(msg.data));
    ws.onclose = () => setTimeout(connect, 1000);
}
connect();
";

/// Render the dashboard page around the current display slots.
///
/// # Errors
///
/// Returns [`ObserverError::Template`] if the page fails to compile or render.
pub fn render_index(display: &DisplaySlots) -> Result<String, ObserverError> {
    let mut env = Environment::new();
    env.add_template(INDEX_NAME, INDEX_TEMPLATE)
        .map_err(|e| ObserverError::Template(format!("failed to add page template: {e}")))?;
    env.get_template(INDEX_NAME)
        .map_err(|e| ObserverError::Template(format!("missing page template: {e}")))?
        .render(context! {
            display => display,
            style => Value::from_safe_string(PAGE_STYLE.to_owned()),
            script => Value::from_safe_string(PAGE_SCRIPT.to_owned()),
        })
        .map_err(|e| ObserverError::Template(format!("page render failed: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn slots(plate: &str) -> DisplaySlots {
        DisplaySlots {
            current_time: "08:00:10".to_owned(),
            vehicle_plate: plate.to_owned(),
            goods_counter: "1,234".to_owned(),
            confidence: "91.2%".to_owned(),
            snapshot_url: "https://placehold.co/600x400/1f2937/34d399?text=MH27AB4410".to_owned(),
        }
    }

    #[test]
    fn slots_render_into_page() {
        let html = render_index(&slots("MH27AB4410")).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<div id="vehicle-plate" class="value">MH27AB4410</div>"#));
        assert!(html.contains(r#"<span id="current-time" class="clock">08:00:10</span>"#));
        assert!(html.contains(">1,234<"));
        assert!(html.contains("91.2%"));
    }

    #[test]
    fn slot_markup_is_escaped() {
        let html = render_index(&slots(r#"<b>"x"</b>"#)).unwrap();
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(html.contains("&quot;x&quot;"));
    }

    #[test]
    fn style_and_script_are_not_escaped() {
        let html = render_index(&slots("-- WAITING --")).unwrap();
        assert!(html.contains("<style>\nbody { background: #111827;"));
        assert!(html.contains("/ws/dashboard"));
        assert!(html.contains("p.textContent = row.text;"));
        assert!(html.contains("location.protocol === 'https:'"));
    }
}
