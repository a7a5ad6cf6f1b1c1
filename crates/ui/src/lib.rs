pub fn index_html() -> &'static str {
    include_str!("../static/index.html")
}

pub fn styles_css() -> &'static str {
    include_str!("../static/styles.css")
}

pub fn app_js() -> &'static str {
    include_str!("../static/app.js")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ui_bundle_contains_index_html() {
        let html = index_html();

        assert!(html.contains("<!doctype html>"));
        assert!(html.contains("/static/styles.css"));
        assert!(html.contains("/static/app.js"));
    }

    #[test]
    fn ui_shell_contains_simulator_panels() {
        let html = index_html();
        assert!(html.contains("Virtual Wallet"));
        assert!(html.contains("Shares Owned"));
        assert!(html.contains("Portfolio Value"));
        assert!(html.contains("Market Movement"));
    }

    #[test]
    fn trade_controls_clamp_quantity_to_one() {
        let html = index_html();
        assert!(html.contains(r#"min="1""#));

        let js = app_js();
        assert!(js.contains("sanitizeQuantity"));
    }

    #[test]
    fn app_js_targets_the_simulator_api() {
        let js = app_js();
        assert!(js.contains("/ws/events"));
        assert!(js.contains("/simulator/trades"));
        assert!(js.contains("/simulator/state"));
    }

    #[test]
    fn app_js_resyncs_with_a_snapshot_request_on_connect() {
        let js = app_js();
        assert!(js.contains("socket.send('snapshot')"));
        assert!(js.contains("event.event_type === 'snapshot'"));
    }
}
