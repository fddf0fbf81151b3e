use super::{ParametersMessage, ParametersState};
use crate::ui::messages::Message;
use iced::Task;
use quadim_studio::models::ImageFile;
use quadim_studio::utils::apply_preset;
use tracing::{debug, error, info};

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff"];

pub fn handle_message(state: &mut ParametersState, message: ParametersMessage) -> Task<Message> {
    match message {
        ParametersMessage::SelectStyle(choice) => {
            state.selected_style = choice;
            apply_preset(choice.key(), &mut state.form);
            Task::none()
        }

        ParametersMessage::SetField(field, value) => {
            debug!("Set {} = {:?}", field.wire_name(), value);
            state.form.set_field(field, value);
            Task::none()
        }

        ParametersMessage::PickImage => {
            if state.is_picking_image {
                return Task::none();
            }
            state.is_picking_image = true;
            Task::perform(pick_image(), |result| match result {
                Ok(image) => Message::Parameters(ParametersMessage::ImagePicked(image)),
                Err(e) => Message::Parameters(ParametersMessage::ImageLoadFailed(e)),
            })
        }

        ParametersMessage::ImagePicked(image) => {
            state.is_picking_image = false;
            if let Some(image) = image {
                info!("Selected image {} ({} bytes)", image.file_name, image.len());
                state.form.image = Some(image);
            }
            Task::none()
        }

        ParametersMessage::ImageLoadFailed(e) => {
            state.is_picking_image = false;
            error!("Failed to load image: {}", e);
            Task::done(Message::ShowError(e))
        }
    }
}

async fn pick_image() -> Result<Option<ImageFile>, String> {
    let Some(handle) = rfd::AsyncFileDialog::new()
        .set_title("Select an image")
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file()
        .await
    else {
        return Ok(None);
    };

    let path = handle.path().to_path_buf();
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    if bytes.is_empty() {
        return Err(format!("{} is empty", path.display()));
    }

    Ok(Some(ImageFile::new(handle.file_name(), bytes)))
}
