//! Assembled analysis result, serialized with camelCase field names.

use serde::{Deserialize, Serialize};

use crate::branches::Branch;
use crate::deadcode::DeadCodeInstance;
use crate::diagnostics::AnalyzeError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub function_name: String,
    pub test_cases: TestCaseResults,
    pub coverage: CoverageResults,
    pub dead_code: DeadCodeResults,
    pub branches_found: Vec<BranchRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResults {
    pub total: u32,
    pub passed: u32,
    pub tuples: Vec<String>,
    pub cases: Vec<CaseOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseOutcome {
    pub input: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageResults {
    pub percentage: u8,
    pub lines: Vec<CoverageLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageLine {
    pub text: String,
    pub covered: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadCodeResults {
    pub found: bool,
    pub instances: Vec<DeadCodeRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadCodeRecord {
    pub line: u32,
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRecord {
    #[serde(rename = "type")]
    pub branch_type: String,
    pub condition: String,
    pub description: String,
    pub line: u32,
}

impl AnalysisResult {
    pub fn to_json(&self) -> Result<String, AnalyzeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl DeadCodeResults {
    pub fn from_instances(instances: &[DeadCodeInstance]) -> Self {
        Self {
            found: !instances.is_empty(),
            instances: instances.iter().map(DeadCodeRecord::from).collect(),
        }
    }
}

impl From<&DeadCodeInstance> for DeadCodeRecord {
    fn from(instance: &DeadCodeInstance) -> Self {
        Self {
            line: instance.line,
            code: instance.code.clone(),
            reason: instance.reason.message().to_string(),
        }
    }
}

impl From<&Branch> for BranchRecord {
    fn from(branch: &Branch) -> Self {
        Self {
            branch_type: branch.type_str().to_string(),
            condition: branch.condition.clone(),
            description: branch.description.clone(),
            line: branch.line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branches::extract_branches;
    use crate::source::SourceUnit;

    fn sample() -> AnalysisResult {
        AnalysisResult {
            function_name: "clamp".into(),
            test_cases: TestCaseResults {
                total: 2,
                passed: 1,
                tuples: vec!["(0,)".into(), "(99,)".into()],
                cases: vec![CaseOutcome {
                    input: "clamp(0)".into(),
                    expected: "0".into(),
                    actual: "0".into(),
                    passed: true,
                    description: "Probe call 1".into(),
                }],
            },
            coverage: CoverageResults {
                percentage: 60,
                lines: vec![CoverageLine { text: "def clamp(n):".into(), covered: false }],
            },
            dead_code: DeadCodeResults { found: false, instances: vec![] },
            branches_found: vec![],
        }
    }

    #[test]
    fn field_names_are_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("functionName").is_some());
        assert!(value.get("testCases").is_some());
        assert!(value.get("deadCode").is_some());
        assert!(value.get("branchesFound").is_some());
        assert_eq!(value["coverage"]["percentage"], 60);
        assert_eq!(value["testCases"]["cases"][0]["description"], "Probe call 1");
    }

    #[test]
    fn branch_record_uses_type_key() {
        let unit = SourceUnit::from_source("def f(n):\n    if n > 0:\n        return 1\n    return 0\n");
        let branches = extract_branches(&unit);
        let records: Vec<BranchRecord> = branches.iter().map(BranchRecord::from).collect();
        let value = serde_json::to_value(&records).unwrap();
        assert_eq!(value[0]["type"], "if");
        assert_eq!(value[1]["type"], "else");
        assert_eq!(value[1]["condition"], "not (n > 0)");
        assert_eq!(value[0]["line"], 2);
    }

    #[test]
    fn pretty_json_round_trips() {
        let text = sample().to_json().unwrap();
        assert!(text.contains("  \"functionName\": \"clamp\""));
        let back: AnalysisResult = serde_json::from_str(&text).unwrap();
        assert_eq!(back.function_name, "clamp");
        assert_eq!(back.test_cases.tuples.len(), 2);
    }
}
