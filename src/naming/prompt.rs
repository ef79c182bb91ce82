/// Style → instruction mapping for the generation service
///
/// One fixed instruction per style. The enum is closed and the match
/// exhaustive, so there is no reachable "unknown style" path.

use crate::state::data::NameStyle;

pub fn instruction_for(style: NameStyle) -> &'static str {
    match style {
        NameStyle::Artistic => {
            "Suggest a short, evocative, artistic title for this image, \
             like the name of a painting. Respond with the title only, \
             no quotes and no explanation."
        }
        NameStyle::Descriptive => {
            "Suggest a short, clear, descriptive title for this image that \
             plainly states what it shows. Respond with the title only, \
             no quotes and no explanation."
        }
        NameStyle::ModernEdgy => {
            "Suggest a short, punchy, modern title for this image with some \
             attitude. Respond with the title only, no quotes and no \
             explanation."
        }
    }
}
