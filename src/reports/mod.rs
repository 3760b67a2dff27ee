use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use perfscore::scorer::{AudioReport, FinalReport, Finger, HandAnalysisResult, Issue, Severity};
use strum::IntoEnumIterator;

fn score_cell(score: u8) -> Cell {
    let cell = Cell::new(score).set_alignment(CellAlignment::Right);
    if score >= 80 {
        cell.fg(Color::Green)
    } else if score >= 60 {
        cell.fg(Color::Yellow)
    } else {
        cell.fg(Color::Red)
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_score_table(rows: &[(&str, u8)], headline: (&str, u8)) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Axis").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
    ]);
    for (name, score) in rows {
        table.add_row(vec![Cell::new(name), score_cell(*score)]);
    }
    table.add_row(vec![
        Cell::new(headline.0)
            .add_attribute(Attribute::Bold)
            .fg(Color::Cyan),
        score_cell(headline.1).add_attribute(Attribute::Bold),
    ]);
    println!("\n{}", table);
}

pub fn print_hand_table(hand: &HandAnalysisResult) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new(format!(
            "Hands ({}/{} frames)",
            hand.detected_frames, hand.frame_count
        ))
        .add_attribute(Attribute::Bold),
        Cell::new("Avg °"),
        Cell::new("Ideal °"),
    ]);
    for i in 1..=2 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for finger in Finger::iter() {
        let (min, max) = finger.ideal_range();
        let avg = match hand.finger_averages.get(finger) {
            Some(a) => format!("{:.1}", a),
            None => "-".to_string(),
        };
        table.add_row(vec![
            Cell::new(finger.label()),
            Cell::new(avg),
            Cell::new(format!("{:.0}-{:.0}", min, max)),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_issues(issues: &[Issue]) {
    if issues.is_empty() {
        println!("\n✅ No issues found.");
        return;
    }

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Severity").add_attribute(Attribute::Bold),
        Cell::new("Issue").add_attribute(Attribute::Bold),
        Cell::new("Details"),
        Cell::new("Suggestion"),
    ]);

    for issue in issues {
        let color = match issue.severity {
            Severity::Info => Color::Blue,
            Severity::Warning => Color::Yellow,
            Severity::Error => Color::Red,
        };
        table.add_row(vec![
            Cell::new(issue.severity).fg(color),
            Cell::new(&issue.title).add_attribute(Attribute::Bold),
            Cell::new(&issue.description),
            Cell::new(&issue.suggestion),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_audio_report(report: &AudioReport) {
    print_score_table(
        &[
            ("Pitch", report.pitch.score),
            ("Rhythm", report.rhythm.score),
            ("Dynamics", report.dynamics.score),
        ],
        ("Audio", report.audio_score),
    );
    print_issues(&report.issues);
}

pub fn print_final_report(report: &FinalReport) {
    if let Some(d) = report.duration {
        println!("\n🎼 Recording length: {:.1}s", d);
    }
    print_score_table(
        &[
            ("Pitch", report.pitch.score),
            ("Rhythm", report.rhythm.score),
            ("Dynamics", report.dynamics.score),
            ("Audio", report.audio_score),
            ("Hand", report.hand.overall_score),
        ],
        ("Overall", report.overall_score),
    );
    if report.hand.hand_detected {
        print_hand_table(&report.hand);
    }
    print_issues(&report.issues);
}
