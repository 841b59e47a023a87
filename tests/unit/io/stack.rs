//! Tests for TIFF stack loading and plane access

#[cfg(test)]
mod tests {
    use budquant::MeasureError;
    use budquant::io::stack::ImageStack;
    use ndarray::{Array2, Array4};
    use tiff::encoder::{TiffEncoder, colortype};

    fn gradient_page(height: usize, width: usize, offset: f64) -> Array2<f64> {
        Array2::from_shape_fn((height, width), |(row, col)| {
            offset + (row * width + col) as f64
        })
    }

    // Tests pages group into frames with channel-fastest ordering
    // Verified by swapping the frame and channel strides
    #[test]
    fn test_from_pages_interleaving() {
        let pages = vec![
            gradient_page(4, 6, 0.0),
            gradient_page(4, 6, 100.0),
            gradient_page(4, 6, 200.0),
            gradient_page(4, 6, 300.0),
        ];

        let stack = ImageStack::from_pages(pages, 2).unwrap();
        assert_eq!(stack.frames(), 2);
        assert_eq!(stack.channels(), 2);
        assert_eq!(stack.height(), 4);
        assert_eq!(stack.width(), 6);

        // Page order is frame 0 channel 0, frame 0 channel 1, frame 1 ...
        let plane = stack.plane(1, 0).unwrap();
        assert!((plane[(0, 0)] - 200.0).abs() < f64::EPSILON);
        let plane = stack.plane(0, 1).unwrap();
        assert!((plane[(0, 0)] - 100.0).abs() < f64::EPSILON);
    }

    // Tests structural validation of the page list
    // Verified by accepting an indivisible page count
    #[test]
    fn test_from_pages_validation() {
        assert!(matches!(
            ImageStack::from_pages(vec![], 1),
            Err(MeasureError::InvalidStack { .. })
        ));
        assert!(ImageStack::from_pages(vec![gradient_page(4, 4, 0.0)], 0).is_err());
        assert!(
            ImageStack::from_pages(
                vec![gradient_page(4, 4, 0.0), gradient_page(4, 4, 0.0)],
                3
            )
            .is_err()
        );
        assert!(
            ImageStack::from_pages(
                vec![gradient_page(4, 4, 0.0), gradient_page(4, 5, 0.0)],
                1
            )
            .is_err()
        );
    }

    // Tests wrapping an array rejects empty dimensions
    // Verified by allowing a zero-frame stack
    #[test]
    fn test_from_array_validation() {
        assert!(ImageStack::from_array(Array4::zeros((0, 1, 4, 4))).is_err());
        assert!(ImageStack::from_array(Array4::zeros((1, 1, 4, 4))).is_ok());
    }

    // Tests plane access bounds checking
    // Verified by clamping out-of-range indices
    #[test]
    fn test_plane_bounds() {
        let stack = ImageStack::from_array(Array4::zeros((2, 3, 4, 4))).unwrap();
        assert!(stack.plane(1, 2).is_some());
        assert!(stack.plane(2, 0).is_none());
        assert!(stack.plane(0, 3).is_none());
    }

    // Tests a multi-page 8-bit TIFF round-trips through the loader
    // Verified by writing pages with distinct intensities
    #[test]
    fn test_from_tiff_path_multi_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.tif");

        let file = std::fs::File::create(&path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        let page_a = vec![10u8; 8 * 8];
        let page_b = vec![200u8; 8 * 8];
        encoder
            .write_image::<colortype::Gray8>(8, 8, &page_a)
            .unwrap();
        encoder
            .write_image::<colortype::Gray8>(8, 8, &page_b)
            .unwrap();
        drop(encoder);

        let stack = ImageStack::from_tiff_path(&path, 2).unwrap();
        assert_eq!(stack.frames(), 1);
        assert_eq!(stack.channels(), 2);
        let bf = stack.plane(0, 0).unwrap();
        assert!((bf[(3, 3)] - 10.0).abs() < f64::EPSILON);
        let fl = stack.plane(0, 1).unwrap();
        assert!((fl[(3, 3)] - 200.0).abs() < f64::EPSILON);
    }

    // Tests a missing file reports a file system error
    // Verified by reporting a decode error instead
    #[test]
    fn test_from_tiff_path_missing_file() {
        let result = ImageStack::from_tiff_path("/nonexistent/stack.tif", 1);
        assert!(matches!(result, Err(MeasureError::FileSystem { .. })));
    }
}
