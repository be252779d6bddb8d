mod common;

use common::*;
use curriculum_pdf::canvas::{Canvas, DrawOp, RecordingCanvas};
use curriculum_pdf::config::{A4_HEIGHT, A4_WIDTH};
use curriculum_pdf::fonts::{FontRegistry, FontStyle};
use curriculum_pdf::layout::{CM, Cursor, Geometry, LINE_FLOOR, PageFlow, Sidebar};
use curriculum_pdf::model::{Card, SectionItem};

fn sidebar() -> Sidebar {
    Sidebar::from_profile(&profile(PROFILE_ID), None)
}

fn numbered_lines(n: usize) -> String {
    (1..=n).map(|i| format!("línea {i}")).collect::<Vec<_>>().join("\n")
}

fn content_texts(canvas: &RecordingCanvas, page: usize) -> Vec<(f32, String)> {
    let x0 = Geometry::new(A4_WIDTH, A4_HEIGHT).content_x();
    canvas.pages()[page]
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { x, y, text, .. } if *x >= x0 - 0.01 => Some((*y, text.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn empty_card_draws_nothing_and_keeps_cursor() {
    let fonts = FontRegistry::builtin();
    let mut canvas = RecordingCanvas::new();
    let mut flow = PageFlow::new(&mut canvas, &fonts, Geometry::new(A4_WIDTH, A4_HEIGHT), sidebar());
    let cursor = flow.begin_document();
    let card = Card::new(
        "Curso vacío",
        vec![("Entidad", Some("   ".to_string())), ("Contacto", None)],
        Some(" \n "),
    );
    assert!(card.is_empty());
    let low = Cursor { y: 20.0, ..cursor };
    let after = flow.draw_card(low, &card);
    assert_eq!(after, low);
    drop(flow);
    assert_eq!(canvas.page_count(), 1);
    assert!(content_texts(&canvas, 0).is_empty());
}

#[test]
fn blank_values_never_reach_the_page() {
    let mut item = job(1, "Analista", "ACME", date(2019, 1, 1), date(2020, 1, 1));
    item.company_email = Some("  ".to_string());
    item.website = Some(String::new());
    item.duties = Some("Soporte".to_string());
    let card = SectionItem::Job(item).card();
    let labels: Vec<&str> = card.pairs.iter().map(|(l, _)| *l).collect();
    assert_eq!(labels, vec!["Inicio", "Fin", "Lugar", "Funciones"]);

    let fonts = FontRegistry::builtin();
    let mut canvas = RecordingCanvas::new();
    let mut flow = PageFlow::new(&mut canvas, &fonts, Geometry::new(A4_WIDTH, A4_HEIGHT), sidebar());
    let cursor = flow.begin_document();
    let after = flow.draw_card(cursor, &card);
    assert!(after.y < cursor.y);
    drop(flow);
    let texts: Vec<String> = content_texts(&canvas, 0).into_iter().map(|(_, t)| t).collect();
    assert!(texts.contains(&"Analista — ACME".to_string()));
    assert!(texts.contains(&"Funciones:".to_string()));
    assert!(!texts.contains(&"Email:".to_string()));
    assert!(!texts.contains(&"Sitio web:".to_string()));
}

#[test]
fn low_cursor_moves_card_to_a_new_sidebar_page() {
    let fonts = FontRegistry::builtin();
    let mut canvas = RecordingCanvas::new();
    let mut flow = PageFlow::new(&mut canvas, &fonts, Geometry::new(A4_WIDTH, A4_HEIGHT), sidebar());
    let cursor = flow.begin_document();
    let card = Card::new("Rust avanzado", vec![("Entidad", Some("ULEAM".to_string()))], None);
    let after = flow.draw_card(Cursor { y: 3.5 * CM, ..cursor }, &card);
    assert_eq!(after.page, 1);
    assert!(after.sidebar);
    drop(flow);
    assert_eq!(canvas.page_count(), 2);
    assert_eq!(canvas.page_of("Rust avanzado"), Some(1));
    for page in 0..2 {
        assert!(canvas.page_texts(page).contains(&FULL_NAME));
    }
}

#[test]
fn long_notes_continue_on_next_page_without_crossing_the_floor() {
    let fonts = FontRegistry::builtin();
    let mut canvas = RecordingCanvas::new();
    let mut flow = PageFlow::new(&mut canvas, &fonts, Geometry::new(A4_WIDTH, A4_HEIGHT), sidebar());
    let cursor = flow.begin_document();
    let notes = numbered_lines(120);
    let card = Card::new("Proyecto", Vec::new(), Some(&notes));
    let cursor = flow.draw_section(cursor, "Productos laborales", std::slice::from_ref(&card));
    assert!(cursor.page >= 2);
    drop(flow);

    for page in 0..canvas.page_count() {
        for (y, text) in content_texts(&canvas, page) {
            assert!(y >= LINE_FLOOR, "{text:?} drawn at {y} on page {page}");
        }
    }
    // Continuations repeat neither the card title nor the section heading.
    let headings = canvas.texts().into_iter().filter(|(_, t)| *t == "Productos laborales").count();
    assert_eq!(headings, 1);
    let titles = canvas.texts().into_iter().filter(|(_, t)| *t == "Proyecto").count();
    assert_eq!(titles, 1);
    assert_eq!(canvas.page_of("línea 120"), Some(canvas.page_count() - 1));
}

#[test]
fn section_heading_repeats_when_next_card_starts_on_new_page() {
    let fonts = FontRegistry::builtin();
    let mut canvas = RecordingCanvas::new();
    let mut flow = PageFlow::new(&mut canvas, &fonts, Geometry::new(A4_WIDTH, A4_HEIGHT), sidebar());
    let cursor = flow.begin_document();
    let tall_notes = numbered_lines(50);
    let cards = vec![
        Card::new("Primero", Vec::new(), Some(&tall_notes)),
        Card::new("Segundo", vec![("Fecha", Some("2021-01-01".to_string()))], None),
    ];
    let cursor = flow.draw_section(cursor, "Experiencia laboral", &cards);
    assert_eq!(cursor.page, 1);
    drop(flow);

    assert_eq!(canvas.page_of("Primero"), Some(0));
    assert_eq!(canvas.page_of("Segundo"), Some(1));
    assert!(canvas.page_texts(0).contains(&"Experiencia laboral"));
    assert!(canvas.page_texts(1).contains(&"Experiencia laboral"));
}

#[test]
fn empty_section_draws_nothing() {
    let fonts = FontRegistry::builtin();
    let mut canvas = RecordingCanvas::new();
    let mut flow = PageFlow::new(&mut canvas, &fonts, Geometry::new(A4_WIDTH, A4_HEIGHT), sidebar());
    let cursor = flow.begin_document();
    let after = flow.draw_section(cursor, "Reconocimientos", &[]);
    assert_eq!(after, cursor);
    drop(flow);
    assert!(content_texts(&canvas, 0).is_empty());
}

fn sidebar_column_w() -> f32 {
    Geometry::new(A4_WIDTH, A4_HEIGHT).sidebar_w - 0.2 * CM
}

#[test]
fn long_card_title_stays_inside_the_content_column() {
    let title: String = "Especialización en arquitectura de software distribuido "
        .repeat(3)
        .chars()
        .take(92)
        .collect();
    assert_eq!(title.chars().count(), 92);
    let card = Card::new(&title, vec![("Entidad", Some("ULEAM".to_string()))], None);

    let fonts = FontRegistry::builtin();
    let g = Geometry::new(A4_WIDTH, A4_HEIGHT);
    let mut canvas = RecordingCanvas::new();
    let mut flow = PageFlow::new(&mut canvas, &fonts, g, sidebar());
    let cursor = flow.begin_document();
    flow.draw_card(cursor, &card);
    drop(flow);

    let title_lines: Vec<(f32, f32, String)> = canvas.pages()[0]
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { x, y, text, style: FontStyle::Bold, size, .. } if *size == 11.6 => {
                Some((*x, *y, text.clone()))
            }
            _ => None,
        })
        .collect();
    assert!(!title_lines.is_empty() && title_lines.len() <= 2);
    assert!(title_lines[0].2.starts_with("Especialización"));
    for (x, _, text) in &title_lines {
        let right = x + fonts.text_width(FontStyle::Bold, text, 11.6);
        assert!(right <= g.content_x() + g.content_w() + 0.01, "{text:?} ends at {right}");
    }

    let last_title_y = title_lines.iter().map(|(_, y, _)| *y).fold(f32::INFINITY, f32::min);
    let label_y = content_texts(&canvas, 0)
        .into_iter()
        .find(|(_, t)| t == "Entidad:")
        .map(|(y, _)| y)
        .unwrap();
    assert!(label_y < last_title_y);
}

#[test]
fn sidebar_clamps_name_and_skips_empty_details() {
    let mut p = profile(PROFILE_ID);
    p.first_names = "Maximiliano Sebastián".to_string();
    p.last_names = "Valdivieso Montenegro".to_string();
    p.sex = Some("  ".to_string());
    let fonts = FontRegistry::builtin();
    let mut canvas = RecordingCanvas::new();
    let mut flow = PageFlow::new(
        &mut canvas,
        &fonts,
        Geometry::new(A4_WIDTH, A4_HEIGHT),
        Sidebar::from_profile(&p, None),
    );
    flow.begin_document();
    drop(flow);

    let texts = canvas.page_texts(0);
    let name = texts
        .iter()
        .find(|t| t.starts_with("Maximiliano"))
        .expect("name drawn");
    assert!(name.ends_with('…'));
    assert!(fonts.text_width(FontStyle::Bold, name, 14.2) <= sidebar_column_w());
    assert!(texts.contains(&"DATOS PERSONALES"));
    assert!(texts.contains(&"Cédula:"));
    assert!(texts.contains(&"1994-03-12"));
    assert!(!texts.contains(&"Sexo:"));
}

#[test]
fn long_summary_drops_details_instead_of_overflowing() {
    let mut p = profile(PROFILE_ID);
    p.summary = Some(numbered_lines(80));
    let fonts = FontRegistry::builtin();
    let mut canvas = RecordingCanvas::new();
    let mut flow = PageFlow::new(
        &mut canvas,
        &fonts,
        Geometry::new(A4_WIDTH, A4_HEIGHT),
        Sidebar::from_profile(&p, None),
    );
    flow.begin_document();
    drop(flow);

    assert_eq!(canvas.page_count(), 1);
    let lowest = canvas.pages()[0]
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { y, .. } => Some(*y),
            _ => None,
        })
        .fold(f32::INFINITY, f32::min);
    assert!(lowest >= 1.6 * CM - 12.0);
    assert!(!canvas.page_texts(0).contains(&"Cédula:"));
}

#[test]
fn long_detail_value_stops_at_the_sidebar_floor() {
    let mut p = profile(PROFILE_ID);
    p.home_address = Some("Calle ".repeat(400));
    let fonts = FontRegistry::builtin();
    let mut canvas = RecordingCanvas::new();
    let mut flow = PageFlow::new(
        &mut canvas,
        &fonts,
        Geometry::new(A4_WIDTH, A4_HEIGHT),
        Sidebar::from_profile(&p, None),
    );
    flow.begin_document();
    drop(flow);

    let x0 = Geometry::new(A4_WIDTH, A4_HEIGHT).content_x();
    let sidebar_ys: Vec<f32> = canvas.pages()[0]
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text { x, y, .. } if *x < x0 => Some(*y),
            _ => None,
        })
        .collect();
    assert!(canvas.page_texts(0).iter().any(|t| t.starts_with("Calle")));
    for y in sidebar_ys {
        assert!(y >= 1.6 * CM - 0.01, "sidebar text at {y}");
    }
}
