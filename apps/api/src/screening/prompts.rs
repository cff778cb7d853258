// LLM prompt templates for the screening stage.
// Placeholders are filled with llm_client::prompts::fill.

/// Strict recruiter verdict.
/// Replace: {experience_level}, {resume_context}, {job_description}
pub const VERDICT_PROMPT_TEMPLATE: &str = r#"Act as an extremely strict technical recruiter whose only goal is to protect the candidate's time by filtering out irrelevant job postings.

TARGET EXPERIENCE LEVEL: {experience_level}

RESUME CONTEXT:
---
{resume_context}
---

JOB DESCRIPTION TO ANALYZE:
---
{job_description}
---

Follow these rules exactly:
1. EXPERIENCE LEVEL CHECK (most important): look at the title and description for seniority cues such as "Senior", "Sr.", "Lead", "Principal", "Staff", "Manager", "Head of", or a minimum number of years of experience. If the role needs more seniority than the target experience level, give it a low rating.
2. FIELD RELEVANCE CHECK: decide whether the core responsibilities match the field the resume shows. Reject postings that are mainly in another field (for example hardware, mechanical engineering, sales or support for a software resume).
3. RATING: an integer from 1 to 10. 7 or higher means a strong match on BOTH the field and the target experience level. Be critical.
4. OUTPUT: return exactly one JSON object and nothing else:
{
  "gemini_rating": 4,
  "ai_reason": "One sentence explaining why the role does or does not fit the field and experience level."
}"#;

/// Resume tailoring suggestions.
/// Replace: {resume_context}, {job_description}
pub const SUGGESTIONS_PROMPT_TEMPLATE: &str = r#"Act as an expert career coach helping the candidate tailor their resume to one job.

RESUME CONTEXT:
---
{resume_context}
---

JOB DESCRIPTION:
---
{job_description}
---

Give specific, actionable suggestions that surface the resume's most relevant skills and experience for this job. Do not invent experience the resume does not show.

Return exactly one JSON object and nothing else:
{
  "suggestions": [
    "Rephrase 'Managed a team' as 'Led a team of 5 engineers ...' to match the leadership requirement.",
    "Add a bullet on your Postgres work; the role lists it as a key requirement."
  ]
}"#;
