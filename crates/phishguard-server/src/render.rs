//! Plain-text rendering of verdicts for the terminal

use phishguard_core::{HybridVerdict, Label, Message};
use phishguard_policy::EvaluationReport;
use std::fmt::Write;

/// Characters of the message shown in reports
const PREVIEW_CHARS: usize = 100;

/// Headline for a final label
pub fn headline(label: Label) -> &'static str {
    match label {
        Label::Spam => "PHISHING ATTEMPT DETECTED",
        Label::Ham => "LEGITIMATE MESSAGE",
    }
}

/// Confidence as a percentage with one decimal, e.g. `97.0%`
pub fn percent(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// Human-readable report for a single message
pub fn verdict_report(message: &Message, verdict: &HybridVerdict) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Result:          {}", headline(verdict.final_label));
    let _ = writeln!(
        out,
        "AI prediction:   {} ({} confidence)",
        verdict.ai_label.as_str().to_uppercase(),
        percent(verdict.ai_confidence)
    );

    if verdict.rule_report.fired() {
        let _ = writeln!(out, "Rules triggered:");
        for finding in verdict.rule_report.findings() {
            let _ = writeln!(out, "  - {}", finding);
        }
    } else {
        let _ = writeln!(out, "Rules triggered: None");
    }

    let _ = write!(out, "Message:         {}", message.preview(PREVIEW_CHARS));
    out
}

/// Side-by-side evaluation summary with a per-class report for each system
pub fn evaluation_report(report: &EvaluationReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Samples:   {}", report.samples);
    let _ = writeln!(out, "Overrides: {}", report.overrides);

    for (name, m) in [("Classifier", &report.classifier), ("Hybrid", &report.hybrid)] {
        let _ = writeln!(out);
        let _ = writeln!(out, "{} accuracy: {:.4}", name, m.accuracy());
        let _ = writeln!(
            out,
            "{:<14} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        );

        let rows = [
            ("Ham", m.class_metrics(Label::Ham)),
            ("Spam", m.class_metrics(Label::Spam)),
            ("macro avg", m.macro_avg()),
            ("weighted avg", m.weighted_avg()),
        ];
        for (row, c) in rows {
            let _ = writeln!(
                out,
                "{:<14} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                row, c.precision, c.recall, c.f1, c.support
            );
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use phishguard_core::{RuleFinding, RuleReport};

    #[test]
    fn test_spam_report() {
        let verdict = HybridVerdict {
            final_label: Label::Spam,
            ai_label: Label::Ham,
            ai_confidence: 0.6,
            rule_report: RuleReport::new(vec![RuleFinding::new("Urgency language")]),
        };
        let report = verdict_report(&Message::new("URGENT: verify now"), &verdict);

        assert!(report.starts_with("Result:          PHISHING ATTEMPT DETECTED"));
        assert!(report.contains("HAM (60.0% confidence)"));
        assert!(report.contains("  - Urgency language"));
        assert!(report.ends_with("URGENT: verify now"));
    }

    #[test]
    fn test_ham_report_without_rules() {
        let verdict = HybridVerdict {
            final_label: Label::Ham,
            ai_label: Label::Ham,
            ai_confidence: 0.97,
            rule_report: RuleReport::default(),
        };
        let report = verdict_report(&Message::new("lunch?"), &verdict);

        assert!(report.contains("LEGITIMATE MESSAGE"));
        assert!(report.contains("Rules triggered: None"));
        assert!(report.contains("97.0%"));
    }

    #[test]
    fn test_evaluation_report_lists_both_classes() {
        let mut report = EvaluationReport {
            samples: 4,
            overrides: 1,
            ..Default::default()
        };
        for (expected, ai, hybrid) in [
            (Label::Ham, Label::Ham, Label::Ham),
            (Label::Ham, Label::Ham, Label::Ham),
            (Label::Spam, Label::Ham, Label::Spam),
            (Label::Spam, Label::Spam, Label::Spam),
        ] {
            report.classifier.record(expected, ai);
            report.hybrid.record(expected, hybrid);
        }

        let text = evaluation_report(&report);
        assert!(text.contains("Classifier accuracy: 0.7500"));
        assert!(text.contains("Hybrid accuracy: 1.0000"));

        let ham_rows: Vec<_> = text.lines().filter(|l| l.starts_with("Ham ")).collect();
        assert_eq!(ham_rows.len(), 2);
        assert!(ham_rows[1].ends_with(" 1.00      1.00      1.00         2"));
        assert_eq!(text.lines().filter(|l| l.starts_with("macro avg")).count(), 2);
        assert_eq!(text.lines().filter(|l| l.starts_with("weighted avg")).count(), 2);
    }

    #[test]
    fn test_long_message_preview_truncated() {
        let verdict = HybridVerdict {
            final_label: Label::Ham,
            ai_label: Label::Ham,
            ai_confidence: 0.9,
            rule_report: RuleReport::default(),
        };
        let report = verdict_report(&Message::new("a".repeat(150)), &verdict);
        assert!(report.ends_with(&format!("{}...", "a".repeat(100))));
    }
}
