use crate::config::CurveSettings;
use crate::curve::svg_path;
use crate::models::Alarm;

const PREVIEW_WIDTH: f64 = 200.0;
const PREVIEW_HEIGHT: f64 = 100.0;

pub fn render_index(alarms: &[Alarm], curves: &CurveSettings) -> String {
    let cards = if alarms.is_empty() {
        EMPTY_HTML.to_string()
    } else {
        alarms
            .iter()
            .map(|alarm| render_card(alarm, curves))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let active = alarms.iter().filter(|alarm| alarm.is_active).count();
    INDEX_HTML
        .replace("{{COUNT}}", &alarms.len().to_string())
        .replace("{{ACTIVE}}", &active.to_string())
        .replace("{{CARDS}}", &cards)
}

fn render_card(alarm: &Alarm, curves: &CurveSettings) -> String {
    let curve = &alarm.intensity_curve;
    let path = svg_path(
        curve.samples(curves.preview_steps, curves.spline_samples),
        PREVIEW_WIDTH,
        PREVIEW_HEIGHT,
    );
    let color = escape(&alarm.color);
    let name = if alarm.name.is_empty() {
        "Rise and shine".to_string()
    } else {
        escape(&alarm.name)
    };

    CARD_HTML
        .replace("{{ID}}", &alarm.id.to_string())
        .replace("{{STATE}}", if alarm.is_active { "on" } else { "off" })
        .replace("{{TIME}}", &escape(&alarm.time))
        .replace("{{NAME}}", &name)
        .replace("{{RECURRENCE}}", &escape(&alarm.recurrence.summary()))
        .replace("{{LENGTH}}", &alarm.length.to_string())
        .replace("{{CURVE}}", curve.curve.as_str())
        .replace("{{START_Y}}", &format!("{:.2}", PREVIEW_HEIGHT - curve.start_intensity))
        .replace("{{END_Y}}", &format!("{:.2}", PREVIEW_HEIGHT - curve.end_intensity))
        .replace("{{PATH}}", &path)
        .replace("{{COLOR}}", &color)
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const EMPTY_HTML: &str = r#"<p class="empty">No alarms yet. Create one through <code>POST /api/alarms</code>.</p>"#;

const CARD_HTML: &str = r##"<article class="alarm {{STATE}}" data-id="{{ID}}">
  <div class="meta">
    <span class="time">{{TIME}}</span>
    <span class="name">{{NAME}}</span>
    <span class="detail">{{RECURRENCE}} &middot; {{LENGTH}} min &middot; {{CURVE}}</span>
  </div>
  <svg viewBox="0 0 200 100" preserveAspectRatio="none" aria-label="intensity curve">
    <line x1="0" y1="100" x2="200" y2="100" stroke="#ddd" stroke-width="1" />
    <line x1="0" y1="0" x2="0" y2="100" stroke="#ddd" stroke-width="1" />
    <path d="{{PATH}}" fill="none" stroke="{{COLOR}}" stroke-width="2" />
    <circle cx="0" cy="{{START_Y}}" r="4" fill="{{COLOR}}" />
    <circle cx="200" cy="{{END_Y}}" r="4" fill="{{COLOR}}" />
  </svg>
  <div class="actions">
    <button class="btn-toggle" data-action="toggle">{{STATE}}</button>
    <button class="btn-delete" data-action="delete">delete</button>
  </div>
</article>"##;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Sunrise Alarm</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
    }

    .alarm {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      grid-template-columns: 1fr 200px auto;
      align-items: center;
      gap: 18px;
    }

    .alarm.off {
      opacity: 0.55;
    }

    .meta span {
      display: block;
    }

    .time {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .detail {
      font-size: 0.85rem;
      color: #8b857d;
    }

    .alarm svg {
      width: 200px;
      height: 100px;
    }

    .actions {
      display: grid;
      gap: 8px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 16px;
      font-weight: 600;
      cursor: pointer;
      color: white;
    }

    .btn-toggle {
      background: var(--accent-2);
    }

    .btn-delete {
      background: var(--accent);
    }

    .empty {
      color: #8b857d;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Sunrise Alarm</h1>
      <p class="subtitle">{{ACTIVE}} of {{COUNT}} alarms active</p>
    </header>
    <section class="alarms">
{{CARDS}}
    </section>
  </main>
  <script>
    document.querySelectorAll('.alarm button').forEach((button) => {
      button.addEventListener('click', async () => {
        const id = button.closest('.alarm').dataset.id;
        const action = button.dataset.action;
        const request = action === 'delete'
          ? fetch(`/api/alarms/${id}`, { method: 'DELETE' })
          : fetch(`/api/alarms/${id}/toggle`, { method: 'POST' });
        await request;
        window.location.reload();
      });
    });
  </script>
</body>
</html>
"#;
