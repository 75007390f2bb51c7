// Resume analysis prompt template.
//
// The resume text is embedded verbatim. Nothing stops a resume from carrying its own
// instructions; the model sees them inside the delimited section and may follow them.

pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an experienced technical recruiter and career coach.
Read the resume text below and produce a structured analysis of the candidate.

Respond with exactly one JSON object and nothing else. No prose before or after it.

OUTPUT SCHEMA (return exactly this structure; every array may be empty but must be present):
{
  "personalDetails": {
    "name": "string",
    "email": "string",
    "phone": "string",
    "links": ["string (profile or portfolio URL)"]
  },
  "content": {
    "summary": "string",
    "experience": [
      {"jobTitle": "string", "company": "string", "duration": "string", "responsibilities": ["string"]}
    ],
    "education": [
      {"degree": "string", "institution": "string", "year": "string"}
    ],
    "projects": [
      {"name": "string", "description": "string", "technologies": ["string"]}
    ]
  },
  "skills": {
    "technical": ["string"],
    "soft": ["string"]
  },
  "aiFeedback": {
    "rating": integer from 1 to 10 inclusive,
    "summary": "string (concise strengths and weaknesses)",
    "improvements": ["string (actionable feedback point)"],
    "upskilling": ["string (skill worth learning next)"]
  }
}

RULES:
1. Use "" for unknown strings and [] for unknown lists. Never use null.
2. "rating" is a bare JSON integer, not a string.
3. Only report details present in the resume text.

RESUME TEXT:
---
{resume_text}
---"#;

/// Builds the analysis prompt for one resume. Pure and deterministic.
pub fn build_analysis_prompt(resume_text: &str) -> String {
    ANALYSIS_PROMPT_TEMPLATE.replace("{resume_text}", resume_text)
}
