//! HTML bodies for candidate-facing emails.

use crate::models::candidate::CandidateStatus;

const ASSESSMENT_PREVIEW_CHARS: usize = 500;

/// Subject and HTML body of one message.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn score_colour(score: f64) -> &'static str {
    if score >= 70.0 {
        "#22c55e"
    } else if score >= 50.0 {
        "#eab308"
    } else {
        "#ef4444"
    }
}

fn layout(heading: &str, subheading: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
  <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
    <div style="background: #0369a1; color: white; padding: 30px; text-align: center; border-radius: 10px 10px 0 0;">
      <h1>{heading}</h1>
      <p>{subheading}</p>
    </div>
    <div style="background: #f9fafb; padding: 30px; border-radius: 0 0 10px 10px;">
{body}
      <p>Best regards,<br>The Recruitment Team</p>
    </div>
  </div>
</body>
</html>"#
    )
}

/// Outcome email sent after screening.
pub fn screening_result(
    candidate_name: &str,
    job_title: &str,
    match_score: f64,
    status: CandidateStatus,
    assessment: Option<&str>,
) -> EmailContent {
    let (subject, message, next_steps) = match status {
        CandidateStatus::Shortlisted => (
            format!("Great News! You've Been Shortlisted for {job_title}"),
            "After careful review of your application, we're pleased to inform you that \
             you've been shortlisted for the next stage of our hiring process.",
            "Our team will be in touch shortly to schedule an interview. \
             Please make sure your contact information is up to date.",
        ),
        CandidateStatus::Rejected => (
            format!("Update on Your Application for {job_title}"),
            "Thank you for your interest in this position. After careful consideration, \
             we've decided to move forward with other candidates whose qualifications more \
             closely match our current needs.",
            "We encourage you to apply for future positions that match your skills and experience.",
        ),
        _ => (
            format!("Application Update: {job_title}"),
            "Thank you for applying. Your application is currently under review.",
            "We'll be in touch with updates on your application status.",
        ),
    };

    let mut body = vec![
        format!("<h2>Hello {},</h2>", escape_html(candidate_name)),
        format!("<p>{message}</p>"),
        format!(
            "<div style=\"background: white; padding: 20px; text-align: center;\">\
             <p>Your Match Score</p>\
             <div style=\"font-size: 48px; font-weight: bold; color: {};\">{:.0}%</div>\
             <p>for {}</p></div>",
            score_colour(match_score),
            match_score,
            escape_html(job_title)
        ),
    ];
    if let Some(text) = assessment.map(str::trim).filter(|a| !a.is_empty()) {
        let preview: String = text.chars().take(ASSESSMENT_PREVIEW_CHARS).collect();
        body.push(format!(
            "<div style=\"background: white; padding: 20px; border-left: 4px solid #0284c7;\">\
             <h3>Assessment Summary</h3><p>{}...</p></div>",
            escape_html(&preview)
        ));
    }
    body.push("<h3>Next Steps</h3>".to_string());
    body.push(format!("<p>{next_steps}</p>"));

    EmailContent {
        html: layout("Smart Recruiter", "Application update", &body.join("\n")),
        subject,
    }
}

/// Invitation sent when a recruiter schedules an interview.
pub fn interview_invite(
    candidate_name: &str,
    job_title: &str,
    interview_date: Option<&str>,
    interview_link: Option<&str>,
) -> EmailContent {
    let when = match interview_date {
        Some(date) => format!("<p><strong>Date:</strong> {}</p>", escape_html(date)),
        None => "<p>Our team will contact you to schedule a convenient time.</p>".to_string(),
    };
    let link = interview_link
        .map(|l| format!("<p><a href=\"{0}\">Join Interview</a></p>", escape_html(l)))
        .unwrap_or_default();

    let body = [
        format!("<h2>Hello {},</h2>", escape_html(candidate_name)),
        "<p>We were impressed with your application and would like to invite you for an interview.</p>"
            .to_string(),
        format!(
            "<div style=\"background: #dbeafe; padding: 20px; border-radius: 10px;\">\
             <h3>Interview Details</h3>{when}{link}</div>"
        ),
        "<h3>Tips for Success</h3>".to_string(),
        "<ul><li>Review the job description and your application</li>\
         <li>Prepare examples of relevant projects and experiences</li>\
         <li>Have questions ready about the role and company</li>\
         <li>Test your equipment if it's a video interview</li></ul>"
            .to_string(),
    ];

    EmailContent {
        subject: format!("Interview Invitation: {job_title}"),
        html: layout("Interview Invitation", &escape_html(job_title), &body.join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_shortlisted_subject_and_score() {
        let email = screening_result(
            "Ada",
            "Rust Engineer",
            82.4,
            CandidateStatus::Shortlisted,
            None,
        );
        assert_eq!(
            email.subject,
            "Great News! You've Been Shortlisted for Rust Engineer"
        );
        assert!(email.html.contains("82%"));
        assert!(email.html.contains("#22c55e"));
        assert!(!email.html.contains("Assessment Summary"));
    }

    #[test]
    fn test_rejected_email_truncates_assessment() {
        let assessment = "a".repeat(900);
        let email = screening_result(
            "Ada",
            "Rust Engineer",
            31.0,
            CandidateStatus::Rejected,
            Some(&assessment),
        );
        assert!(email.subject.starts_with("Update on Your Application"));
        assert!(email.html.contains(&format!("{}...", "a".repeat(500))));
        assert!(!email.html.contains(&"a".repeat(501)));
        assert!(email.html.contains("#ef4444"));
    }

    #[test]
    fn test_names_are_escaped() {
        let email = screening_result(
            "<script>",
            "Dev",
            60.0,
            CandidateStatus::Screening,
            None,
        );
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(!email.html.contains("<script>"));
    }

    #[test]
    fn test_interview_invite_without_date() {
        let email = interview_invite("Ada", "Rust Engineer", None, Some("https://meet.example/x"));
        assert_eq!(email.subject, "Interview Invitation: Rust Engineer");
        assert!(email.html.contains("contact you to schedule"));
        assert!(email.html.contains("https://meet.example/x"));
    }
}
