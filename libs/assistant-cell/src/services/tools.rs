// libs/assistant-cell/src/services/tools.rs
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use appointment_cell::{BookingRequest, BookingService, ReportingService};
use doctor_cell::{AvailabilityService, DoctorService, RecommendationService, ScheduleOutcome};
use notification_cell::{CalendarScheduler, ChannelNotifier, EmailNotifier};
use shared_database::ClinicStore;

use crate::models::{AssistantError, FunctionCall};

/// Every operation the language model may invoke.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "name", content = "args", rename_all = "snake_case")]
pub enum ToolCall {
    GetDoctorSchedule {
        doctor_name: String,
        date: String,
    },
    BookAppointment {
        doctor_name: String,
        patient_email: String,
        date: String,
        time: String,
        #[serde(default)]
        symptoms: Option<String>,
    },
    GetAppointmentSummary {
        query: String,
        #[serde(default)]
        doctor_name: Option<String>,
    },
    ListAllDoctors {},
    FindDoctorBySymptom {
        symptom: String,
    },
}

pub const TOOL_NAMES: [&str; 5] = [
    "get_doctor_schedule",
    "book_appointment",
    "get_appointment_summary",
    "list_all_doctors",
    "find_doctor_by_symptom",
];

impl ToolCall {
    pub fn from_function_call(call: &FunctionCall) -> Result<Self, AssistantError> {
        if !TOOL_NAMES.contains(&call.name.as_str()) {
            return Err(AssistantError::UnknownTool(call.name.clone()));
        }

        let args = match &call.args {
            Value::Null => json!({}),
            args => args.clone(),
        };

        serde_json::from_value(json!({ "name": call.name, "args": args })).map_err(|e| {
            AssistantError::InvalidArguments {
                name: call.name.clone(),
                message: e.to_string(),
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::GetDoctorSchedule { .. } => "get_doctor_schedule",
            ToolCall::BookAppointment { .. } => "book_appointment",
            ToolCall::GetAppointmentSummary { .. } => "get_appointment_summary",
            ToolCall::ListAllDoctors {} => "list_all_doctors",
            ToolCall::FindDoctorBySymptom { .. } => "find_doctor_by_symptom",
        }
    }
}

fn string_param(description: &str) -> Value {
    json!({ "type": "STRING", "description": description })
}

/// Function declarations in the language model's schema dialect.
pub fn tool_declarations() -> Value {
    json!([
        {
            "name": "get_doctor_schedule",
            "description": "Fetches the list of free appointment slots for a doctor on a given day.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "doctor_name": string_param("Full or partial doctor name, e.g. 'Ravi' or 'Dr. Ravi Ahuja'."),
                    "date": string_param("Date in natural language or YYYY-MM-DD, e.g. 'tomorrow' or 'next Friday'.")
                },
                "required": ["doctor_name", "date"]
            }
        },
        {
            "name": "book_appointment",
            "description": "Books an appointment, preventing double bookings and registering new patients.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "doctor_name": string_param("Doctor name, or the exact string 'any' for the first available doctor."),
                    "patient_email": string_param("Patient email address."),
                    "date": string_param("Date in natural language or YYYY-MM-DD."),
                    "time": string_param("Time such as '5 PM', '5:30pm' or '17:00'."),
                    "symptoms": string_param("Optional description of the patient's symptoms.")
                },
                "required": ["doctor_name", "patient_email", "date", "time"]
            }
        },
        {
            "name": "get_appointment_summary",
            "description": "Summarizes appointments for today or yesterday, or counts patients by symptom.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "query": string_param("Question such as 'appointments today' or 'how many patients with fever'."),
                    "doctor_name": string_param("Optional doctor to restrict the summary to.")
                },
                "required": ["query"]
            }
        },
        {
            "name": "list_all_doctors",
            "description": "Lists every doctor with their specialization."
        },
        {
            "name": "find_doctor_by_symptom",
            "description": "Suggests a specialization for a symptom.",
            "parameters": {
                "type": "OBJECT",
                "properties": {
                    "symptom": string_param("Symptom description, e.g. 'skin rash'.")
                },
                "required": ["symptom"]
            }
        }
    ])
}

/// Tool manifest served at `/.well-known/mcp.json`.
pub fn tool_manifest() -> Value {
    json!({ "tools": [{ "function_declarations": tool_declarations() }] })
}

/// Runs [`ToolCall`]s against the clinic services.
pub struct ToolRouter {
    doctors: DoctorService,
    availability: AvailabilityService,
    recommendations: RecommendationService,
    booking: BookingService,
    reporting: ReportingService,
}

impl ToolRouter {
    pub fn new(
        store: Arc<dyn ClinicStore>,
        calendar: Arc<dyn CalendarScheduler>,
        email: Arc<dyn EmailNotifier>,
        channel: Arc<dyn ChannelNotifier>,
    ) -> Self {
        Self {
            doctors: DoctorService::new(Arc::clone(&store)),
            availability: AvailabilityService::new(Arc::clone(&store)),
            recommendations: RecommendationService::new(Arc::clone(&store)),
            booking: BookingService::new(Arc::clone(&store), calendar, email),
            reporting: ReportingService::new(store, channel),
        }
    }

    /// Run a call and wrap its result as the function response payload.
    pub async fn dispatch(&self, call: &ToolCall) -> Value {
        info!("Dispatching tool {}", call.name());

        let result = match call {
            ToolCall::GetDoctorSchedule { doctor_name, date } => {
                match self.availability.get_schedule(doctor_name, date).await {
                    Ok(ScheduleOutcome::Slots { slots, .. }) if !slots.is_empty() => json!(slots),
                    Ok(outcome) => json!(outcome.to_string()),
                    Err(e) => {
                        error!("Schedule tool failed: {}", e);
                        json!(format!("Error fetching schedule: {}", e))
                    }
                }
            }
            ToolCall::BookAppointment {
                doctor_name,
                patient_email,
                date,
                time,
                symptoms,
            } => {
                let request = BookingRequest {
                    doctor_name: doctor_name.clone(),
                    date: date.clone(),
                    time: time.clone(),
                    email: patient_email.clone(),
                    symptoms: symptoms.clone(),
                };
                json!(self.booking.book_message(&request).await)
            }
            ToolCall::GetAppointmentSummary { query, doctor_name } => {
                json!(self.reporting.summary_message(query, doctor_name.as_deref()).await)
            }
            ToolCall::ListAllDoctors {} => json!(self.doctors.directory_message().await),
            ToolCall::FindDoctorBySymptom { symptom } => {
                json!(self.recommendations.recommend_message(symptom).await)
            }
        };

        debug!("Tool {} returned {}", call.name(), result);
        json!({ "result": result })
    }
}
