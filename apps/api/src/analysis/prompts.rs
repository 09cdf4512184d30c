// Instruction template for the résumé analysis call.
// The schema block below is the output contract; parser.rs and report.rs
// enforce it on the way back.

/// Replace `{target_framing}` before sending.
const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert résumé reviewer. Analyze the attached résumé {target_framing}.

Return a JSON object with this EXACT structure:
{
  "candidateLevel": "Junior/Mid/Senior",
  "summary": "Two to three sentence summary of the candidate",
  "matchScore": 75,
  "strengths": ["Strength 1", "Strength 2", "Strength 3"],
  "weaknesses": ["Weakness 1", "Weakness 2"],
  "detailedAnalysis": {
    "experienceMatch": "How the experience matches the role",
    "skillsAssessment": "Assessment of the skill set",
    "jobStability": "Tenure pattern and job-hopping signals",
    "employmentGaps": "Any gaps in the employment history",
    "progressionAndAwards": "Career progression, promotions, awards",
    "teamworkAndSoftSkills": "Collaboration and soft skills",
    "proactivity": "Initiative, side projects, self-direction"
  },
  "suggestedJobs": [{"title": "Suitable role", "description": "Why it fits"}],
  "suggestedProjects": [{"title": "Practice project", "description": "What it would demonstrate"}],
  "suggestedCollaborators": [{"title": "Type of collaborator", "description": "Why working with them helps"}],
  "developmentRoadmap": {
    "courses": [{"name": "Course name", "provider": "Platform", "description": "Why it is needed"}],
    "projects": [{"name": "Project name", "durationOrType": "3 months / Open Source", "description": "What to build"}],
    "jobs": [{"name": "Role to target", "provider": "Type of company", "description": "Requirements and expectations"}]
  }
}

RULES:
- Return ONLY the JSON object. No explanations before or after.
- Do NOT use markdown code fences.
- "matchScore" is an integer from 0 to 100.
- "detailedAnalysis" must contain exactly the seven fields shown.
- Every list may be empty but must be present."#;

const TARGETED_FRAMING_PREFIX: &str = "for the target position";

const GENERAL_FRAMING: &str = "for a general evaluation across the roles it best fits";

/// Builds the analysis instruction. An empty or whitespace target job falls
/// back to the generic evaluation framing.
pub fn build_analysis_instruction(target_job: &str) -> String {
    let target_job = target_job.trim();
    let framing = if target_job.is_empty() {
        GENERAL_FRAMING.to_string()
    } else {
        format!("{TARGETED_FRAMING_PREFIX} \"{target_job}\"")
    };
    ANALYSIS_PROMPT_TEMPLATE.replace("{target_framing}", &framing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_job_appears_in_instruction() {
        let instruction = build_analysis_instruction("Backend Engineer");
        assert!(instruction.contains("for the target position \"Backend Engineer\""));
    }

    #[test]
    fn test_empty_target_job_uses_general_framing() {
        let instruction = build_analysis_instruction("");
        assert!(instruction.contains(GENERAL_FRAMING));
        assert!(!instruction.contains(TARGETED_FRAMING_PREFIX));
    }

    #[test]
    fn test_whitespace_target_job_uses_general_framing() {
        let instruction = build_analysis_instruction("   ");
        assert!(instruction.contains(GENERAL_FRAMING));
    }

    #[test]
    fn test_instruction_forbids_fences() {
        let instruction = build_analysis_instruction("QA Engineer");
        assert!(instruction.contains("Do NOT use markdown code fences"));
    }

    #[test]
    fn test_instruction_names_all_detailed_fields() {
        let instruction = build_analysis_instruction("");
        for field in [
            "experienceMatch",
            "skillsAssessment",
            "jobStability",
            "employmentGaps",
            "progressionAndAwards",
            "teamworkAndSoftSkills",
            "proactivity",
        ] {
            assert!(instruction.contains(field), "missing {field}");
        }
        assert!(instruction.contains("developmentRoadmap"));
    }

    #[test]
    fn test_no_placeholder_survives_substitution() {
        assert!(!build_analysis_instruction("X").contains("{target_framing}"));
    }
}
