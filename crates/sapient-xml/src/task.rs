use crate::error::XmlError;
use crate::walk::{find, flatten};

/// A `SensorTask` received from the SDA server, assigning a control action
/// or a jamming mode to the sensor.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SensorTask {
    /// Sensor ID the task is addressed to.
    pub sensor_id: i32,
    /// Server-assigned identifier of this task.
    pub task_id: i32,
    /// Free-text control field, if present.
    pub control: String,
    /// Free-text command request field, if present.
    pub request: String,
    /// Jamming mode extracted from a `command.mode` field of the form
    /// `"jam <n>"`. Zero if no such field was present.
    pub mode: i32,
}

impl SensorTask {
    /// Decodes a `SensorTask` document. Every field is optional in the
    /// source document; absent fields decode to their default.
    pub fn decode(xml: &str) -> Result<Self, XmlError> {
        let pairs = flatten(xml)?;
        let mut task = SensorTask::default();

        if let Some(raw) = find(&pairs, "SensorTask.sensorID") {
            task.sensor_id = raw.parse().map_err(|_| XmlError::NotAnInteger {
                field: "SensorTask.sensorID",
                value: raw.to_string(),
            })?;
        }
        if let Some(raw) = find(&pairs, "SensorTask.taskID") {
            task.task_id = raw.parse().map_err(|_| XmlError::NotAnInteger {
                field: "SensorTask.taskID",
                value: raw.to_string(),
            })?;
        }
        if let Some(raw) = find(&pairs, "SensorTask.control") {
            task.control = raw.to_string();
        }
        if let Some(raw) = find(&pairs, "SensorTask.command.request") {
            task.request = raw.to_string();
        }
        if let Some(raw) = find(&pairs, "SensorTask.command.mode") {
            if let Some(digits) = raw.strip_prefix("jam ") {
                task.mode = digits.trim().parse().unwrap_or(0);
            }
        }

        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_jam_mode_task() {
        let xml = "<SensorTask><sensorID>6</sensorID><taskID>42</taskID>\
                    <control>Start</control>\
                    <command><request>jamStart</request><mode>jam 3</mode></command>\
                    </SensorTask>";
        let task = SensorTask::decode(xml).unwrap();
        assert_eq!(task.sensor_id, 6);
        assert_eq!(task.task_id, 42);
        assert_eq!(task.control, "Start");
        assert_eq!(task.request, "jamStart");
        assert_eq!(task.mode, 3);
    }

    #[test]
    fn non_jam_mode_field_is_ignored() {
        let xml = "<SensorTask><command><mode>standby</mode></command></SensorTask>";
        let task = SensorTask::decode(xml).unwrap();
        assert_eq!(task.mode, 0);
    }

    #[test]
    fn missing_fields_decode_to_defaults() {
        let xml = "<SensorTask></SensorTask>";
        assert_eq!(SensorTask::decode(xml).unwrap(), SensorTask::default());
    }
}
