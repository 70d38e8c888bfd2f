//! Data models for the application.

mod chart;
mod employee;
mod lenient;
mod skill;
mod user;

pub use chart::ChartDatum;
pub use employee::{join_name, split_name, Certificate, Employee, EmployeeSkill};
pub use skill::{AssignedSkill, NewAssignment, ProficiencyLevel, ProficiencyUpdate, Skill, SkillRef};
pub use user::{AuthResponse, Credentials, RecordId, RegisterRequest, Role, UserProfile};
