// Rendered email bodies for the booking flow. Plain HTML strings; the mail
// relay takes care of delivery.

pub fn otp_verification_email(patient_name: &str, doctor_name: &str, code: &str) -> String {
    format!(
        "<html>\
         <body style=\"font-family: Arial, sans-serif; color: #222;\">\
         <h2>Appointment Verification</h2>\
         <p>Dear {patient_name},</p>\
         <p>Use the code below to confirm your appointment with {doctor_name}. \
         The code is valid for two minutes.</p>\
         <p style=\"font-size: 24px; letter-spacing: 4px;\"><strong>{code}</strong></p>\
         <p>If you did not request this appointment, you can ignore this email.</p>\
         <p>DocConnect</p>\
         </body>\
         </html>"
    )
}

pub fn confirmation_email(
    patient_name: &str,
    doctor_name: &str,
    date_label: &str,
    time_label: &str,
) -> String {
    format!(
        "<html>\
         <body style=\"font-family: Arial, sans-serif; color: #222;\">\
         <h2>Appointment Confirmation</h2>\
         <p>Dear {patient_name},</p>\
         <p>Your appointment with {doctor_name} is confirmed.</p>\
         <p><strong>Date:</strong> {date_label}<br/>\
         <strong>Time:</strong> {time_label}</p>\
         <p>Please arrive a few minutes early and bring any previous \
         prescriptions with you.</p>\
         <p>DocConnect</p>\
         </body>\
         </html>"
    )
}
