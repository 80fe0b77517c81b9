use client_core::view::{GameView, KeyView};

const KEYS_PER_ROW: usize = 13;

pub fn render(view: &GameView) -> String {
    let mut lines = vec![
        format!("== {} ==", view.title),
        view.subtitle.clone(),
        String::new(),
        format!("    {}", view.board.as_deref().unwrap_or("—")),
        String::new(),
        format!(
            "ID: {}   Used: {}",
            view.session_label.as_deref().unwrap_or("—"),
            view.used_count
        ),
    ];

    for row in view.keys.chunks(KEYS_PER_ROW) {
        lines.push(row.iter().map(render_key).collect::<Vec<_>>().join(""));
    }

    if let Some(error) = &view.error {
        lines.push(format!("! {error}"));
    }
    if let Some(end) = view.end_message {
        lines.push(end.to_string());
    }

    let restart = if view.restart_enabled {
        format!(":new to {}", view.restart_label.to_lowercase())
    } else {
        "waiting for the game service…".to_string()
    };
    if view.input_enabled {
        lines.push(format!("Guess a letter, {restart}, :quit to exit"));
    } else {
        lines.push(format!("{restart}, :quit to exit"));
    }

    lines.join("\n")
}

fn render_key(key: &KeyView) -> String {
    if key.used {
        " · ".to_string()
    } else if key.enabled {
        format!("[{}]", key.letter)
    } else {
        format!(" {} ", key.letter)
    }
}
