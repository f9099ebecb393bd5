//! Gesture identifier to human-readable label table

/// Canonical gesture identifiers and the phrase each one stands for
pub const GESTURE_LABELS: &[(&str, &str)] = &[
    ("Thumbs_Up", "Yes/Agree"),
    ("Thumbs_Down", "No/Disagree"),
    ("Victory", "Two/Peace"),
    ("Pointing_Up", "One/Look up"),
    ("Open_Palm", "Hello/Here"),
    ("Closed_Fist", "Stop/Hold"),
    ("ILoveYou", "I love you"),
    // Numbers
    ("Index_Finger_Up", "1"),
    ("Index_And_Middle_Up", "2"),
    ("Index_Middle_Ring_Up", "3"),
    ("Four_Fingers_Up", "4"),
    ("Five_Fingers_Up", "5"),
    // ASL
    ("Pinch", "Small/Little"),
    ("Spread_Fingers", "Big/Large"),
    ("Index_Pinky_Up", "I love you (ASL)"),
    ("Thumb_Index_L", "L"),
    ("Thumb_Pinky_Up", "Call me/Phone"),
    ("Middle_Finger_Up", "Middle/Center"),
    ("Waving_Hand", "Hello/Goodbye"),
    ("Pointing_Right", "Right/That way"),
    ("Pointing_Left", "Left/That way"),
    ("Palm_Down", "No/Down/Stop"),
    ("Palm_Up", "Yes/Up/Question"),
    ("Finger_Crossed", "Hope/Wish"),
    ("OK_Sign", "OK/Perfect"),
    ("Rock_On", "Fun/Party"),
    ("Peace_Sign", "Peace/Two"),
    // Advanced
    ("Gun_Sign", "Danger/Gun"),
    ("Knife_Sign", "Danger/Knife"),
    ("Crossed_Arms", "No/Block/Disagree"),
    ("Raised_Hand", "Attention/Stop"),
    ("Hands_Up", "Surrender/Don't shoot"),
    ("Hand_On_Chest", "Respect/Promise"),
    ("Finger_Gun", "Threat/Imitate gun"),
    ("Shushing", "Quiet/Be silent"),
    ("Throat_Slash", "Threat/Warning"),
    ("Two_Hands_Up", "Surrender/Calm down"),
    ("Hand_Covering_Mouth", "Surprise/Shocked"),
    ("Clenched_Two_Fists", "Anger/Ready to fight"),
    ("Fist_Bump", "Greeting/Friendly"),
    ("Salute", "Respect/Attention"),
    // Emergency / special
    ("SOS_Signal", "Help/Emergency"),
    ("Two_Fingers_Sideways", "V/Peace (sideways)"),
    ("Circular_Hand_Motion", "Come here/Roll forward"),
    ("Hand_Tapping_Wrist", "Time/Check watch"),
    ("Hand_Cupping_Ear", "Can't hear/Repeat"),
    ("Hand_Waving_Face", "Hot/Exhausted"),
    ("Hand_Moving_Away", "Go away/Distance"),
    ("Fist_Shaking", "Angry/Threat"),
    ("Hands_Clasped", "Beg/Request"),
    // Emitted by the stock recognizer model
    ("Thumb_Down", "No/Disagree"),
];

/// Label for a known identifier
pub fn known_label(name: &str) -> Option<&'static str> {
    GESTURE_LABELS
        .iter()
        .find(|(id, _)| *id == name)
        .map(|(_, label)| *label)
}

/// Label for `name`, or `name` itself when it is not in the table
pub fn label_for(name: &str) -> &str {
    known_label(name).unwrap_or(name)
}
