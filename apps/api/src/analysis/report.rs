//! Typed analysis result. Deserialization IS the shape validation: a reply
//! missing required fields fails the decode instead of flowing downstream
//! partially filled.

use serde::{Deserialize, Deserializer, Serialize};

/// Full evaluation returned to the caller. Created once per successful
/// analysis, never mutated, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub candidate_level: String,
    pub summary: String,
    /// 0–100. Out-of-range numeric input is clamped by the parser.
    pub match_score: u8,
    #[serde(deserialize_with = "null_to_default")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "null_to_default")]
    pub weaknesses: Vec<String>,
    pub detailed_analysis: DetailedAnalysis,
    #[serde(default, deserialize_with = "null_to_default")]
    pub suggested_jobs: Vec<Recommendation>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub suggested_projects: Vec<Recommendation>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub suggested_collaborators: Vec<Recommendation>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub development_roadmap: DevelopmentRoadmap,
}

/// The seven fixed assessment dimensions. All required — a reply missing any
/// of them is incomplete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedAnalysis {
    pub experience_match: String,
    pub skills_assessment: String,
    pub job_stability: String,
    pub employment_gaps: String,
    pub progression_and_awards: String,
    pub teamwork_and_soft_skills: String,
    pub proactivity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
}

/// Three-stage development plan: courses to take, practice projects, job
/// opportunities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevelopmentRoadmap {
    #[serde(default, deserialize_with = "null_to_default")]
    pub courses: Vec<RoadmapItem>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub projects: Vec<RoadmapItem>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub jobs: Vec<RoadmapItem>,
}

/// One roadmap entry. The capability fills `provider` for courses/jobs and
/// `durationOrType` for projects, so everything past the name is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapItem {
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub provider: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub duration_or_type: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,
}

/// Treats an explicit JSON `null` like an absent field. Models emit both
/// interchangeably; the output contract is "empty, never null".
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_REPORT: &str = r#"{
        "candidateLevel": "Mid",
        "summary": "Four years of backend work with steady growth.",
        "matchScore": 72,
        "strengths": ["Solid API design", "Test discipline"],
        "weaknesses": ["No production cloud experience"],
        "detailedAnalysis": {
            "experienceMatch": "Close to the target role.",
            "skillsAssessment": "Strong core stack.",
            "jobStability": "Two employers in four years.",
            "employmentGaps": "None.",
            "progressionAndAwards": "Promoted once.",
            "teamworkAndSoftSkills": "Led a small team.",
            "proactivity": "Maintains an open-source tool."
        },
        "suggestedJobs": [{"title": "Backend Engineer", "description": "Good stack overlap."}],
        "suggestedProjects": [{"title": "Event pipeline", "description": "Covers the cloud gap."}],
        "suggestedCollaborators": [{"title": "SRE mentor", "description": "Operational depth."}],
        "developmentRoadmap": {
            "courses": [{"name": "Distributed Systems", "provider": "Coursera", "description": "Fills the gap."}],
            "projects": [{"name": "Deploy a k8s service", "durationOrType": "3 months", "description": "Hands-on."}],
            "jobs": [{"name": "Platform Engineer", "provider": "Mid-size product company", "description": "Next step."}]
        }
    }"#;

    #[test]
    fn test_full_report_deserializes() {
        let report: AnalysisReport = serde_json::from_str(FULL_REPORT).unwrap();
        assert_eq!(report.candidate_level, "Mid");
        assert_eq!(report.match_score, 72);
        assert_eq!(report.strengths.len(), 2);
        assert_eq!(report.detailed_analysis.job_stability, "Two employers in four years.");
        assert_eq!(report.suggested_jobs[0].title, "Backend Engineer");
        assert_eq!(report.development_roadmap.courses[0].provider, "Coursera");
        assert_eq!(
            report.development_roadmap.projects[0].duration_or_type,
            "3 months"
        );
        // provider absent for project items
        assert_eq!(report.development_roadmap.projects[0].provider, "");
    }

    #[test]
    fn test_missing_detailed_analysis_field_fails() {
        let mut value: serde_json::Value = serde_json::from_str(FULL_REPORT).unwrap();
        value["detailedAnalysis"]
            .as_object_mut()
            .unwrap()
            .remove("proactivity");
        assert!(serde_json::from_value::<AnalysisReport>(value).is_err());
    }

    #[test]
    fn test_missing_match_score_fails() {
        let mut value: serde_json::Value = serde_json::from_str(FULL_REPORT).unwrap();
        value.as_object_mut().unwrap().remove("matchScore");
        assert!(serde_json::from_value::<AnalysisReport>(value).is_err());
    }

    #[test]
    fn test_null_recommendation_lists_become_empty() {
        let mut value: serde_json::Value = serde_json::from_str(FULL_REPORT).unwrap();
        value["suggestedJobs"] = serde_json::Value::Null;
        value["strengths"] = serde_json::Value::Null;
        value["developmentRoadmap"] = serde_json::Value::Null;

        let report: AnalysisReport = serde_json::from_value(value).unwrap();
        assert!(report.suggested_jobs.is_empty());
        assert!(report.strengths.is_empty());
        assert!(report.development_roadmap.courses.is_empty());
    }

    #[test]
    fn test_missing_roadmap_defaults_empty() {
        let mut value: serde_json::Value = serde_json::from_str(FULL_REPORT).unwrap();
        value.as_object_mut().unwrap().remove("developmentRoadmap");

        let report: AnalysisReport = serde_json::from_value(value).unwrap();
        assert!(report.development_roadmap.jobs.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let report: AnalysisReport = serde_json::from_str(FULL_REPORT).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert!(value.get("candidateLevel").is_some());
        assert!(value.get("matchScore").is_some());
        let detailed = value["detailedAnalysis"].as_object().unwrap();
        assert_eq!(detailed.len(), 7);
        assert!(detailed.contains_key("teamworkAndSoftSkills"));
    }
}
