//! Embedded control page.

use std::fmt;

use crate::server::{FanState, Power};

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Power::Off => write!(f, "OFF"),
            Power::On => write!(f, "ON"),
        }
    }
}

/// Render the control page for the current state. The slider pushes speed
/// changes over `fetch("/set?speed=...")` and updates the label locally, so
/// no reload happens while dragging.
pub fn render(state: &FanState) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Fan Control</title>
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <script>
        function sendSpeed(value) {{
            fetch("/set?speed=" + value);
            document.getElementById("speedValue").innerText = value;
        }}
    </script>
</head>
<body>
    <h1>Fan Control</h1>

    <p>Fan is currently: <b>{power}</b></p>

    <a href="/?fan=on"><button>Turn ON</button></a>
    <a href="/?fan=off"><button>Turn OFF</button></a>

    <h3>Speed: <span id="speedValue">{speed}</span>%</h3>

    <input type="range" min="0" max="100" value="{speed}"
           oninput="sendSpeed(this.value)">
</body>
</html>
"#,
        power = state.power,
        speed = state.speed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_reflects_state_and_speed() {
        let page = render(&FanState {
            power: Power::On,
            speed: 42,
        });
        assert!(page.contains("<b>ON</b>"));
        assert!(page.contains(r#"<span id="speedValue">42</span>"#));
        assert!(page.contains(r#"value="42""#));
    }

    #[test]
    fn page_links_both_switch_queries() {
        let page = render(&FanState::default());
        assert!(page.contains("<b>OFF</b>"));
        assert!(page.contains(r#"href="/?fan=on""#));
        assert!(page.contains(r#"href="/?fan=off""#));
    }
}
