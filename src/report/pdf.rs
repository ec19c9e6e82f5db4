//! PDF patient summary via `printpdf`, built-in fonts only.

use std::io::BufWriter;

use printpdf::*;

use crate::models::{AgitationLog, AssessmentRecord, VitalsEntry};

#[derive(Debug, thiserror::Error)]
#[error("PDF generation failed: {0}")]
pub struct ReportError(String);

/// Render a one-page patient summary. Returns PDF bytes.
pub fn patient_report(
    patient_id: &str,
    assessments: &[AssessmentRecord],
    logs: &[AgitationLog],
    last_vitals: Option<&VitalsEntry>,
) -> Result<Vec<u8>, ReportError> {
    let title = format!("NeuroScan Patient Report — {patient_id}");
    let (doc, page1, layer1) = PdfDocument::new(&title, Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError(format!("font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError(format!("font error: {e}")))?;

    let mut y = Mm(280.0);

    layer.use_text(&title, 14.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    layer.use_text(
        format!("Generated: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M UTC")),
        9.0,
        Mm(20.0),
        y,
        &font,
    );
    y -= Mm(10.0);

    layer.use_text("LATEST VITALS:", 11.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    match last_vitals {
        Some(v) => {
            let lines = [
                format!("HRV: {} ms", v.hrv),
                format!("Sleep score: {}", v.sleep_score),
                format!("Activity score: {}", v.activity_score),
                format!("Medication adherence: {}%", v.medication_adherence),
                format!("Recorded: {}", v.timestamp),
            ];
            for line in lines {
                layer.use_text(&line, 9.0, Mm(25.0), y, &font);
                y -= Mm(4.5);
            }
        }
        None => {
            layer.use_text("No vitals recorded.", 9.0, Mm(25.0), y, &font);
            y -= Mm(4.5);
        }
    }
    y -= Mm(6.0);

    layer.use_text("RECENT ASSESSMENTS:", 11.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    if assessments.is_empty() {
        layer.use_text("No assessments recorded.", 9.0, Mm(25.0), y, &font);
        y -= Mm(4.5);
    }
    for record in assessments.iter().take(10) {
        let text = format!(
            "{} — score {:.0} — {}",
            record.kind, record.score, record.timestamp
        );
        layer.use_text(&text, 9.0, Mm(25.0), y, &font);
        y -= Mm(4.5);
    }
    y -= Mm(6.0);

    layer.use_text("BEHAVIORAL EPISODES:", 11.0, Mm(20.0), y, &bold);
    y -= Mm(6.0);
    if logs.is_empty() {
        layer.use_text("No episodes logged.", 9.0, Mm(25.0), y, &font);
        y -= Mm(4.5);
    }
    for log in logs.iter().take(10) {
        let text = format!("{} ({}) — {}", log.event_type, log.severity, log.timestamp);
        layer.use_text(&text, 9.0, Mm(25.0), y, &font);
        y -= Mm(4.5);
        for line in wrap_text(&log.context, 85) {
            layer.use_text(&line, 8.0, Mm(28.0), y, &font);
            y -= Mm(4.0);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError(format!("save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError(format!("buffer error: {e}")))
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
