use chrono::NaiveTime;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use crate::models::{SchedulerError, WeeklySchedule};

/// Static registry of departments, their doctors, and each doctor's weekly
/// availability template. Purely deterministic lookups; no failure modes
/// after construction.
#[derive(Debug, Clone)]
pub struct ScheduleCatalog {
    departments: BTreeMap<String, Vec<String>>,
    schedules: HashMap<String, WeeklySchedule>,
}

impl ScheduleCatalog {
    /// Build a catalog from an explicit roster, rejecting invalid rosters up
    /// front: a doctor listed in two departments, or a schedule entry for a
    /// doctor the roster does not know.
    pub fn new(
        departments: BTreeMap<String, Vec<String>>,
        schedules: HashMap<String, WeeklySchedule>,
    ) -> Result<Self, SchedulerError> {
        let mut seen = HashSet::new();
        for (department, doctors) in &departments {
            for doctor in doctors {
                if !seen.insert(doctor.as_str()) {
                    return Err(SchedulerError::Validation(format!(
                        "{} is listed in more than one department (including {})",
                        doctor, department
                    )));
                }
            }
        }
        for doctor in schedules.keys() {
            if !seen.contains(doctor.as_str()) {
                return Err(SchedulerError::Validation(format!(
                    "Schedule refers to unknown doctor {}",
                    doctor
                )));
            }
        }

        debug!(
            "Schedule catalog loaded: {} departments, {} doctors",
            departments.len(),
            seen.len()
        );
        Ok(Self {
            departments,
            schedules,
        })
    }

    /// Department -> doctors mapping, as a defensive copy.
    pub fn departments(&self) -> BTreeMap<String, Vec<String>> {
        self.departments.clone()
    }

    pub fn department_exists(&self, department: &str) -> bool {
        self.departments.contains_key(department)
    }

    pub fn doctor_in_department(&self, department: &str, doctor: &str) -> bool {
        self.departments
            .get(department)
            .map(|doctors| doctors.iter().any(|d| d == doctor))
            .unwrap_or(false)
    }

    /// Weekly template for a doctor. Unknown doctors fall back to the default
    /// weekday schedule; the catalog may lag real staffing, so this is a
    /// permissive default rather than an error.
    pub fn schedule_for(&self, doctor: &str) -> WeeklySchedule {
        self.schedules.get(doctor).cloned().unwrap_or_default()
    }

    /// The hospital's standing roster.
    pub fn hospital_default() -> Self {
        let mut departments = BTreeMap::new();
        let mut add = |dept: &str, doctors: &[&str]| {
            departments.insert(
                dept.to_string(),
                doctors.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            );
        };

        add("Cardiology", &["Dr. Harsh Sharma"]);
        add("Pediatrics", &["Dr. Arjun Gupta"]);
        add("Orthopedics", &["Dr. Sameer Khan"]);
        add("Neurology", &["Dr. Ananya Reddy"]);
        add("Oncology", &["Dr. Fatima Ahmed"]);
        add("Dermatology", &["Dr. Meera Desai", "Dr. Rohit Malhotra"]);
        add("General Surgery", &["Dr. Vikram Singh", "Dr. Anjali Mehta"]);
        add(
            "General Medicine",
            &["Dr. Rajesh Kumar", "Dr. Kavita Joshi", "Dr. Suresh Iyer"],
        );
        add("Gastroenterology", &["Dr. Anil Verma"]);
        add("Nephrology", &["Dr. Pooja Nair"]);
        add("OB-GYN", &["Dr. Sneha Pillai", "Dr. Ritu Kapoor"]);
        add("Ophthalmology", &["Dr. Manish Agarwal"]);
        add("ENT", &["Dr. Deepak Rao"]);
        add("Psychiatry", &["Dr. Shalini Gupta", "Dr. Aryan Choudhury"]);
        add("Pulmonology", &["Dr. Karan Bhatia"]);
        add("Endocrinology", &["Dr. Nisha Patel"]);
        add("Urology", &["Dr. Abhishek Jain"]);
        add("Rheumatology", &["Dr. Priyanka Sharma"]);

        let mut schedules = HashMap::new();
        let mut slot = |doctor: &str, days: &[u8], start: (u32, u32), end: (u32, u32)| {
            let schedule = WeeklySchedule::new(
                days.to_vec(),
                NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap(),
                NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap(),
            )
            .unwrap();
            schedules.insert(doctor.to_string(), schedule);
        };

        slot("Dr. Harsh Sharma", &[0, 1, 2, 3, 4], (9, 0), (17, 0));
        slot("Dr. Arjun Gupta", &[0, 2, 4], (10, 0), (18, 0));
        slot("Dr. Sameer Khan", &[1, 3, 5], (8, 0), (16, 0));
        slot("Dr. Ananya Reddy", &[0, 1, 2, 3], (11, 0), (19, 0));
        slot("Dr. Fatima Ahmed", &[0, 1, 2, 3, 4], (9, 0), (17, 0));
        slot("Dr. Meera Desai", &[0, 2, 4], (9, 0), (17, 0));
        slot("Dr. Rohit Malhotra", &[1, 3, 5], (10, 0), (16, 0));
        slot("Dr. Vikram Singh", &[0, 1, 2, 3, 4], (7, 0), (15, 0));
        slot("Dr. Anjali Mehta", &[1, 2, 4], (9, 0), (17, 0));
        slot("Dr. Rajesh Kumar", &[0, 1, 2, 3, 4, 5], (8, 0), (14, 0));
        slot("Dr. Kavita Joshi", &[0, 2, 3, 4], (14, 0), (20, 0));
        slot("Dr. Suresh Iyer", &[1, 3, 5], (9, 0), (15, 0));
        slot("Dr. Anil Verma", &[0, 2, 4], (10, 0), (18, 0));
        slot("Dr. Pooja Nair", &[1, 3, 5], (9, 0), (16, 0));
        slot("Dr. Sneha Pillai", &[0, 1, 2, 3, 4], (9, 0), (17, 0));
        slot("Dr. Ritu Kapoor", &[0, 2, 3], (10, 0), (18, 0));
        slot("Dr. Manish Agarwal", &[0, 1, 3, 4], (8, 0), (16, 0));
        slot("Dr. Deepak Rao", &[0, 2, 4], (9, 0), (17, 0));
        slot("Dr. Shalini Gupta", &[0, 1, 2, 3, 4], (10, 0), (18, 0));
        slot("Dr. Aryan Choudhury", &[1, 3, 5], (11, 0), (17, 0));
        slot("Dr. Karan Bhatia", &[0, 2, 4], (9, 0), (16, 0));
        slot("Dr. Nisha Patel", &[1, 3], (10, 0), (17, 0));
        slot("Dr. Abhishek Jain", &[0, 1, 3], (8, 0), (15, 0));
        slot("Dr. Priyanka Sharma", &[2, 4], (10, 0), (16, 0));

        // The standing roster is known-good; construction cannot fail.
        Self::new(departments, schedules).expect("hospital roster is valid")
    }
}
