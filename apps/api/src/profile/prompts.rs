// Resume parsing prompt. The caller still scans the reply for a single
// top-level JSON object before validating, so fenced or prose-wrapped output
// is tolerated but never trusted.

pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"You are a resume parser. Extract structured information from the resume text below.
Return valid JSON with exactly this schema:

{
  "name": "Full Name",
  "email": "email@example.com",
  "phone": "+1234567890",
  "location": "City, Country",
  "years_experience": 5,
  "tech_stack": ["Python", "Django", "Docker"],
  "desired_positions": ["Backend Engineer"],
  "projects": [
    {
      "name": "Project Name",
      "description": "Brief description of the project",
      "technologies": ["Python", "React"]
    }
  ]
}

Rules:
1. "name", "email", "phone", "years_experience" and "tech_stack" must always be present.
2. "years_experience" is an integer between 0 and 60.
3. Omit optional fields you cannot fill rather than inventing values.
4. Output ONLY the JSON object. No markdown fences, no commentary.

Resume:
{resume_text}"#;
