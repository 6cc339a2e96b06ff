mod helpers;
use helpers::*;

use clilog::{
    AffixStyle, Attr, CallerStyle, CliHandler, ColorMode, Error, Level, LevelStyle, Logger,
    Record, Style,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use time::macros::datetime;

#[test]
fn no_color_line() {
    let (h, mem) = build_mem(CliHandler::builder().style(Style::no_color()));
    h.handle(&Record::new(Level::INFO, format_args!("info message")))
        .unwrap();
    assert_eq!(mem.text(), "[INF] info message\n");
}

#[test]
fn every_bucket_has_its_text() {
    let (h, mem) = build_mem(CliHandler::builder().level(Level::DEBUG));
    for l in [Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR] {
        h.handle(&Record::new(l, format_args!("m"))).unwrap();
    }
    assert_eq!(mem.lines(), ["DBG m", "INF m", "WRN m", "ERR m"]);
}

#[test]
fn severities_above_error_render_as_error() {
    let (h, mem) = mem_handler();
    h.handle(&Record::new(Level::from_i32(12), format_args!("boom")))
        .unwrap();
    assert_eq!(mem.text(), "ERR boom\n");
}

#[test]
fn unknown_level_writes_nothing() {
    let (h, mem) = mem_handler();
    let err = h
        .handle(&Record::new(Level::from_i32(2), format_args!("lost")))
        .unwrap_err();
    assert!(matches!(err, Error::UnknownLevel(l) if l == Level::from_i32(2)));
    assert!(mem.text().is_empty());
}

#[test]
fn values_with_spaces_are_quoted() {
    let (h, mem) = mem_handler();
    let r = Record::new(Level::INFO, format_args!("m")).with_attrs([
        Attr::string("k", "v"),
        Attr::string("msg", "hello world"),
        Attr::string("path", r"C:\tmp"),
    ]);
    h.handle(&r).unwrap();
    assert_eq!(mem.text(), "INF m k=v msg=\"hello world\" path=\"C:\\\\tmp\"\n");
}

#[test]
fn attrs_attached_before_a_group_stay_outside_it() {
    let (h, mem) = mem_handler();
    let h = h.with_attrs(vec![Attr::int("a", 1)]).with_group("g");
    h.handle(&Record::new(Level::INFO, format_args!("m")).with_attr(Attr::int("b", 2)))
        .unwrap();
    assert_eq!(mem.text(), "INF m a=1 g.b=2\n");
}

#[test]
fn nested_groups_and_group_values() {
    let (h, mem) = mem_handler();
    let h = h
        .with_group("req")
        .with_attrs(vec![Attr::string("id", "7f")])
        .with_group("db");
    let r = Record::new(Level::WARN, format_args!("slow")).with_attr(Attr::group(
        "query",
        [Attr::uint("rows", 3), Attr::group("empty", [])],
    ));
    h.handle(&r).unwrap();
    assert_eq!(mem.text(), "WRN slow req.id=7f req.db.query.rows=3\n");
}

#[test]
fn level_text_is_centered_in_its_width() {
    let style = Style::builder()
        .level(
            Level::INFO,
            LevelStyle {
                prefix: AffixStyle::plain("["),
                suffix: AffixStyle::plain("]"),
                text: "INFO".to_owned(),
                color: None,
                width: 6,
            },
        )
        .build();
    let (h, mem) = build_mem(CliHandler::builder().style(style));
    h.handle(&Record::new(Level::INFO, format_args!("msg")))
        .unwrap();
    assert_eq!(mem.text(), "[ INFO ] msg\n");
}

#[test]
fn label_precedes_message() {
    let (h, mem) = build_mem(CliHandler::builder().label("app"));
    h.handle(&Record::new(Level::INFO, format_args!("ready")))
        .unwrap();
    assert_eq!(mem.text(), "INF app ready\n");
}

#[test]
fn time_uses_the_configured_format() {
    let (h, mem) = build_mem(
        CliHandler::builder()
            .show_time(true)
            .time_format("[hour]:[minute]:[second]"),
    );
    let r = Record::new(Level::INFO, format_args!("tick"))
        .with_time(datetime!(2024-05-01 12:30:05 UTC))
        .with_attr(Attr::bool("ok", true));
    h.handle(&r).unwrap();
    assert_eq!(mem.text(), "INF tick time=12:30:05 ok=true\n");
}

#[test]
fn default_time_format_is_rfc3339() {
    let (h, mem) = build_mem(CliHandler::builder().show_time(true));
    let r = Record::new(Level::INFO, format_args!("tick"))
        .with_time(datetime!(2024-05-01 12:30:05 UTC));
    h.handle(&r).unwrap();
    assert_eq!(mem.text(), "INF tick time=2024-05-01T12:30:05Z\n");
}

#[test]
fn redaction_and_empty_keys() {
    let (h, mem) = build_mem(CliHandler::builder().redact(|a| {
        if a.key == "password" {
            Attr::string("password", "***")
        } else {
            a
        }
    }));
    let r = Record::new(Level::INFO, format_args!("login")).with_attrs([
        Attr::string("user", "bob"),
        Attr::string("", "dropped"),
        Attr::string("password", "hunter2"),
    ]);
    h.handle(&r).unwrap();
    assert_eq!(mem.text(), "INF login user=bob password=***\n");
}

#[test]
fn redactor_runs_once_per_record_attribute() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let (h, mem) = build_mem(CliHandler::builder().redact(move |a| {
        seen.fetch_add(1, Ordering::SeqCst);
        a
    }));
    let h = h.with_attrs(vec![Attr::int("a", 1)]);
    let before = calls.load(Ordering::SeqCst);

    let r = Record::new(Level::INFO, format_args!("m"))
        .with_attrs([Attr::int("b", 2), Attr::string("", "skipped")]);
    h.handle(&r).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst) - before, 1);
    assert_eq!(mem.text(), "INF m a=1 b=2\n");
}

#[test]
fn caller_shows_module_and_line() {
    let (h, mem) = build_mem(CliHandler::builder().show_caller(true));
    let lg = Logger::new(h);
    let line = line!() + 2;
    for _ in 0..2 {
        clilog::info!(lg, "here");
    }
    clilog::info!(lg, "there");
    let want = format!("INF <render:{line}> here");
    assert_eq!(mem.lines()[..2], [want.clone(), want]);
    assert_eq!(mem.lines()[2], format!("INF <render:{}> there", line + 2));
}

#[test]
fn caller_full_path_shows_the_file() {
    let style = Style::builder()
        .caller(CallerStyle {
            prefix: AffixStyle::plain("<"),
            suffix: AffixStyle::plain(">"),
            color: None,
            full_path: true,
        })
        .build();
    let (h, mem) = build_mem(CliHandler::builder().show_caller(true).style(style));
    let lg = Logger::new(h);
    clilog::warn!(lg, "there");
    let text = mem.text();
    assert!(text.starts_with("[WRN] <"), "{text}");
    assert!(text.contains("render.rs:"), "{text}");
}

#[test]
fn records_without_a_call_site_show_no_caller() {
    let (h, mem) = build_mem(CliHandler::builder().show_caller(true));
    Logger::new(h).info("plain", vec![]).unwrap();
    assert_eq!(mem.text(), "INF plain\n");
}

#[test]
fn color_modes() {
    let (h, mem) = build_mem(CliHandler::builder().color_mode(ColorMode::Always));
    h.handle(&Record::new(Level::INFO, format_args!("always")).with_attr(Attr::int("n", 1)))
        .unwrap();
    let text = mem.text();
    assert!(has_ansi(&text), "expected ANSI with Always, got: {text}");

    let (h, mem) = build_mem(CliHandler::builder().color_mode(ColorMode::Never));
    h.handle(&Record::new(Level::INFO, format_args!("never")))
        .unwrap();
    assert!(!has_ansi(&mem.text()));
    assert!(h.style().level[&Level::INFO].color.is_none());

    // Auto with a custom writer: treated as non-TTY
    let (h, mem) = mem_handler();
    h.handle(&Record::new(Level::INFO, format_args!("auto")))
        .unwrap();
    assert!(!has_ansi(&mem.text()));
}

#[test]
fn presets_render_the_same_text_without_colors() {
    for (style, want) in [
        (Style::no_color(), "[WRN] m k=v\n"),
        (Style::basic_foreground(), "WRN m k=v\n"),
        (Style::vivid_foreground(), "WRN m k=v\n"),
        (Style::basic_background(), " WRN  m k=v\n"),
        (Style::vivid_background(), " WRN  m k=v\n"),
    ] {
        let (h, mem) = build_mem(CliHandler::builder().style(style));
        h.handle(&Record::new(Level::WARN, format_args!("m")).with_attr(Attr::string("k", "v")))
            .unwrap();
        assert_eq!(mem.text(), want);
    }
}

#[test]
fn two_handlers_render_identically() {
    let (a, ma) = mem_handler();
    let (b, mb) = mem_handler();
    let a = a.with_attrs(vec![Attr::int("x", 1)]);
    let b = b.with_attrs(vec![Attr::int("x", 1)]);
    let r = Record::new(Level::ERROR, format_args!("same")).with_time(datetime!(2020-01-01 0:00 UTC));
    a.handle(&r).unwrap();
    b.handle(&r).unwrap();
    a.handle(&r).unwrap();
    assert_eq!(ma.lines(), ["ERR same x=1", "ERR same x=1"]);
    assert_eq!(mb.lines(), ["ERR same x=1"]);
}
