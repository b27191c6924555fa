use crate::glm;
use crate::rendering::sprite::{map_atlas_rect, TexCoords};
use crate::utils::error::BatchError;
use gl::types::*;
use stb_image::image::{Image, LoadResult};
use std::path::Path;

/// data for a single sprite vertex
#[derive(Default, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct SpriteVertex {
    pub position: glm::Vec2,
    pub tex_coords: glm::Vec2,
    pub color: glm::Vec4,
}

/// an opengl texture that is deleted when dropped
#[derive(Debug)]
pub struct Texture {
    pub(crate) id: GLuint,
    width: u32,
    height: u32,
    channels: usize,
}

impl Texture {
    /// loads a texture from an image file, keeping the channel count of the source image
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BatchError> {
        let path = path.as_ref();
        let image: Image<u8> = match stb_image::image::load_with_depth(path, 0, false) {
            LoadResult::ImageU8(image) => image,
            LoadResult::ImageF32(_) => {
                return Err(BatchError::ResourceLoad(format!(
                    "unsupported hdr texture: {}",
                    path.display()
                )));
            }
            LoadResult::Error(msg) => {
                return Err(BatchError::ResourceLoad(format!(
                    "failed to load texture {}: {msg}",
                    path.display()
                )));
            }
        };
        let format = texture_format(image.depth).ok_or_else(|| {
            BatchError::ResourceLoad(format!(
                "unsupported channel count {} in texture {}",
                image.depth,
                path.display()
            ))
        })?;

        let mut id = 0;
        unsafe {
            gl::GenTextures(1, &mut id);
            gl::BindTexture(gl::TEXTURE_2D, id);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as GLint);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                gl::LINEAR_MIPMAP_LINEAR as GLint,
            );
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
            // rows of RED and RGB images are not 4 byte aligned
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format as GLint,
                image.width as GLsizei,
                image.height as GLsizei,
                0,
                format,
                gl::UNSIGNED_BYTE,
                image.data.as_ptr() as *const GLvoid,
            );
            gl::GenerateMipmap(gl::TEXTURE_2D);
            gl::BindTexture(gl::TEXTURE_2D, 0);
        }
        log::debug!(
            "loaded texture {} ({}x{}, {} channels)",
            path.display(),
            image.width,
            image.height,
            image.depth
        );

        Ok(Self {
            id,
            width: image.width as u32,
            height: image.height as u32,
            channels: image.depth,
        })
    }

    /// width in pixels
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// height in pixels
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// number of color channels of the source image
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// maps a pixel rectangle of this texture (used as an atlas) to normalized texture coordinates
    pub fn atlas_rect(&self, x: f32, y: f32, width: f32, height: f32) -> TexCoords {
        map_atlas_rect(self.width as f32, self.height as f32, x, y, width, height)
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.id);
        }
    }
}

/// yields the gl pixel format for an image with the given channel count
pub(crate) fn texture_format(channels: usize) -> Option<GLenum> {
    match channels {
        1 => Some(gl::RED),
        3 => Some(gl::RGB),
        4 => Some(gl::RGBA),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn vertex_layout() {
        assert_eq!(size_of::<SpriteVertex>(), 8 * size_of::<f32>());
        assert_eq!(offset_of!(SpriteVertex, position), 0);
        assert_eq!(offset_of!(SpriteVertex, tex_coords), 2 * size_of::<f32>());
        assert_eq!(offset_of!(SpriteVertex, color), 4 * size_of::<f32>());
    }

    #[test]
    fn channel_formats() {
        assert_eq!(texture_format(1), Some(gl::RED));
        assert_eq!(texture_format(3), Some(gl::RGB));
        assert_eq!(texture_format(4), Some(gl::RGBA));
        assert_eq!(texture_format(2), None);
        assert_eq!(texture_format(0), None);
    }

    #[test]
    fn missing_texture_file() {
        // decoding fails before any gl call is made
        let res = Texture::load("does/not/exist.png");
        assert!(matches!(res, Err(BatchError::ResourceLoad(_))));
    }
}
