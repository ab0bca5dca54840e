//! Format layer creation macros

/// Format layer with the display options applied.
macro_rules! create_fmt_layer {
    ($format:ident, $display:expr) => {{
        tracing_subscriber::fmt::layer()
            .$format()
            .with_writer(std::io::stderr)
            .with_ansi($display.colors)
            .with_target($display.target)
            .with_file($display.source)
            .with_line_number($display.source)
    }};
}

/// JSON layer with the current span attached to each event.
macro_rules! create_json_layer {
    ($display:expr) => {{
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(false)
            .with_target($display.target)
            .with_file($display.source)
            .with_line_number($display.source)
    }};
}
