// Interview question-generation prompt templates.
// All prompts for the interview module are defined here.

pub const TECH_QUESTIONS_PROMPT_TEMPLATE: &str = r#"You are an interviewer. Generate {count} concise technical interview questions for a candidate skilled in {techs}.
Questions should test depth of knowledge, not trivia, and must name the listed technologies.
Return only the questions, one per line, as a numbered list."#;

pub const PROJECT_QUESTION_PROMPT_TEMPLATE: &str = r#"You are an interviewer. The candidate lists this project on their resume:

Name: {name}
Description: {description}
Technologies: {technologies}

Generate exactly one interview question about this project that probes the candidate's own role and the hardest problems they solved.
Return only the question text on a single line."#;

pub const ROLE_QUESTIONS_PROMPT_TEMPLATE: &str = r#"You are an interviewer screening a candidate for a {role} position.
Generate {count} general interview questions appropriate for that role, covering ways of working, collaboration and past experience.
Return only the questions, one per line, as a numbered list."#;
