use crate::models::{CardStatus, Layout, Mode, TaskView, TodayView};

pub fn render_index(view: &TodayView) -> String {
    let challenge = &view.challenge;
    let challenge_line = if challenge.active {
        let start = challenge.start_date.as_deref().unwrap_or("");
        let mut line = format!(
            "Day {} of 30 · {} left · started {}",
            challenge.days_passed,
            challenge.days_left,
            escape(start)
        );
        if challenge.complete {
            line.push_str(" · 🏆 30 days done! Pick a new goal or keep the streak going.");
        }
        line
    } else {
        "Set a start date: the 30 days are counted from it.".to_string()
    };

    let board = match &view.board {
        Some(board) => format!(
            "<pre class=\"board\">{}</pre><p class=\"hint\">{}</p>",
            board.text, board.legend
        ),
        None => "<p class=\"hint\">Set the challenge start date to hit the road 🚵</p>".to_string(),
    };

    let mode_note = if view.mode_frozen {
        format!(
            "<p class=\"hint\">Today stays in {:?} mode; the toggle applies from tomorrow.</p>",
            view.mode
        )
    } else {
        String::new()
    };

    let warning = view
        .storage_warning
        .as_deref()
        .map(|msg| format!("<div class=\"status\" data-type=\"error\">Not saved: {}</div>", escape(msg)))
        .unwrap_or_default();

    fill(INDEX_HTML, |key| {
        let value = match key {
            "GREETING" => escape(&view.greeting),
            "DATE" => view.date.clone(),
            "HARD_CHECKED" => {
                let checked = if view.toggle == Mode::Hard { "checked" } else { "" };
                checked.to_string()
            }
            "MODE_NOTE" => mode_note.clone(),
            "LAYOUT_OPTIONS" => layout_options(view.layout),
            "COMPLETED" => view.completed.to_string(),
            "TOTAL" => view.total.to_string(),
            "TASKS" => render_tasks(view),
            "CHALLENGE_LINE" => challenge_line.clone(),
            "CHALLENGE_PCT" => format!("{:.0}", challenge.fraction * 100.0),
            "START_VALUE" => challenge.start_date.clone().unwrap_or_else(|| view.date.clone()),
            "BOARD" => board.clone(),
            "WATER" => view.water_ml.to_string(),
            "WATER_GOAL" => view.water_goal_ml.to_string(),
            "WATER_PCT" => format!("{:.0}", view.water_fraction * 100.0),
            "BONUS" => escape(&view.bonus),
            "NOTES" => escape(&view.notes),
            "MOTIVATION" => escape(&view.motivation),
            "WARNING" => warning.clone(),
            _ => return None,
        };
        Some(value)
    })
}

/// Single pass over `template`. Substituted text is never scanned again, so
/// user input that looks like a placeholder stays literal. Unknown keys are
/// left as written.
fn fill(template: &str, value: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find("}}") else {
            rest = &rest[open..];
            break;
        };
        let key = &after[..close];
        match value(key) {
            Some(text) => out.push_str(&text),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[close + 2..];
    }
    out.push_str(rest);
    out
}

fn layout_options(current: Layout) -> String {
    Layout::ALL
        .iter()
        .map(|layout| {
            let selected = if *layout == current { " selected" } else { "" };
            format!("<option value=\"{layout:?}\"{selected}>{layout:?}</option>")
        })
        .collect()
}

fn render_tasks(view: &TodayView) -> String {
    match view.layout {
        Layout::Classic => view.tasks.iter().map(checkbox).collect(),
        Layout::Focus => {
            let focus: String = view
                .tasks
                .iter()
                .filter(|task| view.focus.contains(&task.id))
                .map(|task| {
                    format!(
                        "<button class=\"btn-add\" type=\"button\" data-done=\"{}\">Do it now: {}</button>",
                        task.id,
                        escape(task.name)
                    )
                })
                .collect();
            if focus.is_empty() {
                "<p class=\"hint\">Nothing left for today 🎉</p>".to_string()
            } else {
                focus
            }
        }
        Layout::Dashboard => format!(
            "<p>✅ {}</p><p>🕗 {}</p>",
            list_or_dash(&view.dashboard.done),
            list_or_dash(&view.dashboard.pending)
        ),
        Layout::Kanban => kanban(view),
    }
}

fn checkbox(task: &TaskView) -> String {
    format!(
        "<label class=\"task\" title=\"{hint}\"><input type=\"checkbox\" data-task=\"{id}\"{checked} /> <strong>{name}</strong> <em>{category}</em></label>",
        hint = escape(task.hint),
        id = task.id,
        checked = if task.done { " checked" } else { "" },
        name = escape(task.name),
        category = escape(task.category),
    )
}

fn kanban(view: &TodayView) -> String {
    let Some(columns) = &view.kanban else {
        return String::new();
    };
    let column_html = |status: CardStatus, cards: &[String]| {
        let cards: String = cards
            .iter()
            .filter_map(|name| view.tasks.iter().find(|task| task.name == name.as_str()))
            .map(|task| {
                let left = match status {
                    CardStatus::Todo => None,
                    CardStatus::Doing => Some(CardStatus::Todo),
                    CardStatus::Done => Some(CardStatus::Doing),
                };
                let right = match status {
                    CardStatus::Todo => Some(CardStatus::Doing),
                    CardStatus::Doing => Some(CardStatus::Done),
                    CardStatus::Done => None,
                };
                let button = |target: Option<CardStatus>, label: &str| {
                    target
                        .map(|target| {
                            format!(
                                "<button type=\"button\" data-move=\"{}\" data-to=\"{}\">{label}</button>",
                                task.id,
                                target.label()
                            )
                        })
                        .unwrap_or_default()
                };
                format!(
                    "<div class=\"card\"><strong>{}</strong><small>{}</small>{}{}</div>",
                    escape(task.name),
                    escape(task.hint),
                    button(left, "◀️"),
                    button(right, "▶️")
                )
            })
            .collect();
        format!("<div class=\"column\"><h3>{}</h3>{cards}</div>", status.label())
    };
    format!(
        "<div class=\"kanban\">{}{}{}</div>",
        column_html(CardStatus::Todo, &columns.todo),
        column_html(CardStatus::Doing, &columns.doing),
        column_html(CardStatus::Done, &columns.done)
    )
}

fn list_or_dash(names: &[&str]) -> String {
    if names.is_empty() {
        "—".to_string()
    } else {
        escape(&names.join(", "))
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Bike Quest</title>
  <style>
    :root {
      --peach: #ffdab9;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.7);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(180deg, var(--peach) 0%, #fff7f2 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      display: grid;
      gap: 24px;
    }

    section {
      background: var(--card);
      border-radius: 18px;
      padding: 20px;
      display: grid;
      gap: 12px;
    }

    h1, h2 {
      margin: 0;
      text-align: center;
    }

    button {
      border: none;
      border-radius: 12px;
      padding: 0.5rem 0.9rem;
      font-weight: 600;
      cursor: pointer;
    }

    .btn-add {
      background: var(--accent);
      color: white;
    }

    .btn-sub {
      background: var(--accent-2);
      color: white;
    }

    .row {
      display: flex;
      gap: 12px;
      align-items: center;
      flex-wrap: wrap;
    }

    .task {
      display: block;
      padding: 6px 0;
    }

    progress {
      width: 100%;
    }

    .board {
      font-size: 1.4rem;
      line-height: 1.6rem;
      text-align: center;
    }

    .kanban {
      display: grid;
      grid-template-columns: repeat(3, 1fr);
      gap: 12px;
    }

    .card {
      background: white;
      border-radius: 12px;
      padding: 10px;
      margin-bottom: 8px;
      display: grid;
      gap: 6px;
    }

    textarea {
      width: 100%;
      min-height: 120px;
    }

    .hint {
      margin: 0;
      color: #6f6a65;
      font-size: 0.9rem;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .motivation {
      background: #e3f6e8;
      border-radius: 12px;
      padding: 12px;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>🚵 Bike Quest</h1>
      <h2>{{GREETING}}</h2>
      <p class="hint">Day: {{DATE}}</p>
      {{WARNING}}
    </header>

    <section>
      <div class="row">
        <label><input id="hard" type="checkbox" {{HARD_CHECKED}} /> Hard mode (all goals)</label>
        <label>Layout <select id="layout">{{LAYOUT_OPTIONS}}</select></label>
      </div>
      {{MODE_NOTE}}
    </section>

    <section>
      <h2>🧱 30 days without alcohol</h2>
      <div class="row">
        <input id="start-date" type="date" value="{{START_VALUE}}" />
        <button type="button" id="set-start">Set start</button>
        <form method="post" action="/challenge/today"><button type="submit">Start today</button></form>
        <form method="post" action="/challenge/clear"><button type="submit">Clear start</button></form>
      </div>
      <progress max="100" value="{{CHALLENGE_PCT}}"></progress>
      <p>{{CHALLENGE_LINE}}</p>
    </section>

    <section>
      <h2>🎯 Today's goals · {{COMPLETED}}/{{TOTAL}}</h2>
      {{TASKS}}
    </section>

    <section>
      <h2>💧 Water (goal {{WATER_GOAL}} ml)</h2>
      <div class="row">
        <form method="post" action="/water/sub"><button class="btn-sub" type="submit">-250 ml</button></form>
        <progress max="100" value="{{WATER_PCT}}"></progress>
        <form method="post" action="/water/add"><button class="btn-add" type="submit">+250 ml</button></form>
      </div>
      <p>Drunk: <strong>{{WATER}} ml / {{WATER_GOAL}} ml</strong></p>
      <p>🎲 Bonus of the day: <strong>{{BONUS}}</strong> (optional)</p>
    </section>

    <section>
      <h2>📝 Notes for today</h2>
      <textarea id="notes" placeholder="Thoughts, observations, gratitude">{{NOTES}}</textarea>
      <button type="button" id="save-notes">Save notes</button>
    </section>

    <section>
      <p class="motivation">💬 {{MOTIVATION}}</p>
      <h2>🎮 Bike Quest: the 30-day route 🚵 → 🏰</h2>
      {{BOARD}}
    </section>
  </main>
  <script>
    const post = async (url, body) => {
      const response = await fetch(url, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(body)
      });
      if (!response.ok) {
        alert(await response.text());
        return;
      }
      window.location.reload();
    };

    document.querySelectorAll('input[data-task]').forEach((box) => {
      box.addEventListener('change', () => post('/api/tasks/toggle', { task: box.dataset.task, done: box.checked }));
    });
    document.querySelectorAll('button[data-done]').forEach((button) => {
      button.addEventListener('click', () => post('/api/tasks/toggle', { task: button.dataset.done, done: true }));
    });
    document.querySelectorAll('button[data-move]').forEach((button) => {
      button.addEventListener('click', () => post('/api/board/move', { task: button.dataset.move, status: button.dataset.to }));
    });
    document.getElementById('hard').addEventListener('change', (event) => post('/api/mode', { hard: event.target.checked }));
    document.getElementById('layout').addEventListener('change', (event) => post('/api/layout', { layout: event.target.value }));
    document.getElementById('set-start').addEventListener('click', () => {
      post('/api/challenge', { start_date: document.getElementById('start-date').value || null });
    });
    document.getElementById('save-notes').addEventListener('click', () => {
      post('/api/notes', { notes: document.getElementById('notes').value });
    });
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppData;
    use crate::reconcile::reconcile;
    use chrono::NaiveDate;

    fn view_for(layout: Layout, notes: &str) -> TodayView {
        let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        let mut data = AppData::default();
        data.ui.layout = layout;
        data.challenge.start_date = Some(today);
        reconcile(&mut data, today, Mode::Light, &mut rand::thread_rng());
        let day = data.days.get_mut("2026-06-01").unwrap();
        day.notes = notes.to_string();
        if layout == Layout::Kanban {
            crate::reconcile::ensure_board(day);
        }
        crate::view::build(&data, today, "Hi", None)
    }

    #[test]
    fn page_fills_every_placeholder() {
        let html = render_index(&view_for(Layout::Classic, ""));
        assert!(!html.contains("{{"));
        assert!(html.contains("data-task=\"meditation\""));
        assert!(html.contains("🚵"));
    }

    #[test]
    fn notes_are_escaped() {
        let html = render_index(&view_for(Layout::Classic, "<script>x</script>"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
    }

    #[test]
    fn placeholders_in_notes_stay_literal() {
        let html = render_index(&view_for(Layout::Classic, "{{WARNING}} {{MOTIVATION}} {{GREETING}}"));
        assert!(html.contains("{{WARNING}} {{MOTIVATION}} {{GREETING}}"));
    }

    #[test]
    fn fill_keeps_unknown_and_unclosed_keys() {
        let out = fill("a {{X}} b {{Y}} c {{Z", |key| (key == "X").then(|| "{{Y}}".to_string()));
        assert_eq!(out, "a {{Y}} b {{Y}} c {{Z");
    }

    #[test]
    fn kanban_layout_renders_columns() {
        let html = render_index(&view_for(Layout::Kanban, ""));
        assert!(html.contains("class=\"kanban\""));
        assert!(html.contains("data-to=\"Doing\""));
    }
}
