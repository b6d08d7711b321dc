#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use kitti_rescale::{
        prepare_output_directory, run, RescaleConfig, RescaleError, TargetSize,
    };
    use std::fs;
    use std::path::{Path, PathBuf};

    const CAR: &str = "Car 0 0 0 10 20 30 40 1 1 1 1 1 1 1\n";

    struct Dataset {
        _root: tempfile::TempDir,
        root: PathBuf,
        images: PathBuf,
        labels: PathBuf,
    }

    impl Dataset {
        fn new() -> Self {
            let root_dir = tempfile::tempdir().unwrap();
            let root = root_dir.path().to_path_buf();
            let images = root.join("images");
            let labels = root.join("labels");
            fs::create_dir(&images).unwrap();
            fs::create_dir(&labels).unwrap();
            Self {
                _root: root_dir,
                root,
                images,
                labels,
            }
        }

        fn add(&self, image_name: &str, width: u32, height: u32, label_name: &str, label: &str) {
            write_image(&self.images.join(image_name), width, height);
            fs::write(self.labels.join(label_name), label).unwrap();
        }

        fn scaled_images(&self) -> PathBuf {
            self.root.join("scaled_images")
        }

        fn scaled_annotations(&self) -> PathBuf {
            self.root.join("scaled_annotations")
        }
    }

    fn write_image(path: &Path, width: u32, height: u32) {
        RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]))
            .save(path)
            .unwrap();
    }

    fn config(width: u32, height: u32) -> RescaleConfig {
        RescaleConfig::new(TargetSize::new(width, height))
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_rescale_single_pair() {
        let dataset = Dataset::new();
        dataset.add("a.png", 100, 200, "a.txt", CAR);

        let stats = run(&dataset.images, &dataset.labels, &config(50, 100)).unwrap();
        assert_eq!(stats.images_resized, 1);
        assert_eq!(stats.annotation_files_written, 1);
        assert_eq!(stats.annotation_lines_rescaled, 1);

        let dims = image::image_dimensions(dataset.scaled_images().join("a.png")).unwrap();
        assert_eq!(dims, (50, 100));

        let label = fs::read_to_string(dataset.scaled_annotations().join("a.txt")).unwrap();
        assert_eq!(label, "Car 0 0 0 5.0 10.0 15.0 20.0 1 1 1 1 1 1 1\n");
    }

    #[test]
    fn test_output_dimensions_ignore_aspect_ratio() {
        let dataset = Dataset::new();
        dataset.add("wide.png", 37, 11, "wide.txt", CAR);
        dataset.add("tiny.png", 1, 1, "tiny.txt", "Car 0 0 0 0 0 1 1 0 0 0 0 0 0 0\n");

        run(&dataset.images, &dataset.labels, &config(64, 48)).unwrap();

        for name in ["wide.png", "tiny.png"] {
            let dims = image::image_dimensions(dataset.scaled_images().join(name)).unwrap();
            assert_eq!(dims, (64, 48));
        }
        let tiny = fs::read_to_string(dataset.scaled_annotations().join("tiny.txt")).unwrap();
        assert_eq!(tiny, "Car 0 0 0 0.0 0.0 64.0 48.0 0 0 0 0 0 0 0\n");
    }

    #[test]
    fn test_multiple_lines_and_no_trailing_newline() {
        let dataset = Dataset::new();
        let label = "Car 0.00 0 -1.57 100.00 50.00 200.00 150.00 1.5 1.6 3.9 1.0 1.7 20.0 -1.55\n\
                     \n\
                     DontCare -1 -1 -10 20.00 40.00 60.00 80.00 -1 -1 -1 -1000 -1000 -1000 -10";
        dataset.add("frame.png", 400, 200, "frame.txt", label);

        let stats = run(&dataset.images, &dataset.labels, &config(200, 400)).unwrap();
        assert_eq!(stats.annotation_lines_rescaled, 2);
        assert_eq!(stats.blank_lines_passed, 1);

        let out = fs::read_to_string(dataset.scaled_annotations().join("frame.txt")).unwrap();
        assert_eq!(
            out,
            "Car 0.00 0 -1.57 50.0 100.0 100.0 300.0 1.5 1.6 3.9 1.0 1.7 20.0 -1.55\n\
             \n\
             DontCare -1 -1 -10 10.0 80.0 30.0 160.0 -1 -1 -1 -1000 -1000 -1000 -10"
        );
    }

    #[test]
    fn test_scaling_to_original_size_keeps_boxes() {
        let dataset = Dataset::new();
        let label = "Cyclist 0 0 0 12.5 7.25 99.75 63.0 1 1 1 1 1 1 1\n";
        dataset.add("same.png", 128, 64, "same.txt", label);

        run(&dataset.images, &dataset.labels, &config(128, 64)).unwrap();

        let out = fs::read_to_string(dataset.scaled_annotations().join("same.txt")).unwrap();
        assert_eq!(out, label);
    }

    #[test]
    fn test_annotation_name_uses_file_stem() {
        let dataset = Dataset::new();
        dataset.add("frame.0001.png", 20, 20, "frame.0001.txt", CAR);

        run(&dataset.images, &dataset.labels, &config(10, 10)).unwrap();

        assert!(dataset.scaled_images().join("frame.0001.png").is_file());
        assert!(dataset.scaled_annotations().join("frame.0001.txt").is_file());
    }

    #[test]
    fn test_empty_input_directory() {
        let dataset = Dataset::new();

        let stats = run(&dataset.images, &dataset.labels, &config(10, 10)).unwrap();

        assert_eq!(stats.images_resized, 0);
        assert!(dataset.scaled_images().is_dir());
        assert!(dataset.scaled_annotations().is_dir());
        assert!(dir_entries(&dataset.scaled_images()).is_empty());
        assert!(dir_entries(&dataset.scaled_annotations()).is_empty());
    }

    #[test]
    fn test_runs_are_idempotent() {
        let dataset = Dataset::new();
        dataset.add("a.png", 30, 40, "a.txt", CAR);
        dataset.add("b.png", 16, 16, "b.txt", CAR);

        run(&dataset.images, &dataset.labels, &config(20, 20)).unwrap();
        let first_image = fs::read(dataset.scaled_images().join("a.png")).unwrap();
        let first_label = fs::read(dataset.scaled_annotations().join("b.txt")).unwrap();

        // Stale output from an earlier run must not survive
        fs::write(dataset.scaled_images().join("stale.png"), b"old").unwrap();

        run(&dataset.images, &dataset.labels, &config(20, 20)).unwrap();
        assert_eq!(dir_entries(&dataset.scaled_images()), vec!["a.png", "b.png"]);
        assert_eq!(dir_entries(&dataset.scaled_annotations()), vec!["a.txt", "b.txt"]);
        assert_eq!(
            fs::read(dataset.scaled_images().join("a.png")).unwrap(),
            first_image
        );
        assert_eq!(
            fs::read(dataset.scaled_annotations().join("b.txt")).unwrap(),
            first_label
        );
    }

    #[test]
    fn test_prepare_output_directory() {
        let temp_dir = tempfile::tempdir().unwrap();

        let fresh = temp_dir.path().join("fresh");
        prepare_output_directory(&fresh).unwrap();
        assert!(fresh.is_dir());

        let used = temp_dir.path().join("used");
        fs::create_dir(&used).unwrap();
        fs::write(used.join("one.txt"), "1").unwrap();
        fs::write(used.join("two.png"), "2").unwrap();

        prepare_output_directory(&used).unwrap();
        assert!(used.is_dir());
        assert!(dir_entries(&used).is_empty());

        // Subdirectories are never deleted
        let nested = temp_dir.path().join("nested");
        fs::create_dir_all(nested.join("inner")).unwrap();
        fs::write(nested.join("inner").join("keep.txt"), "3").unwrap();
        assert!(matches!(
            prepare_output_directory(&nested),
            Err(RescaleError::UnexpectedSubdirectory { .. })
        ));
        assert!(nested.join("inner").join("keep.txt").is_file());

        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            prepare_output_directory(&file),
            Err(RescaleError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_missing_annotation_aborts() {
        let dataset = Dataset::new();
        write_image(&dataset.images.join("orphan.png"), 8, 8);

        let err = run(&dataset.images, &dataset.labels, &config(4, 4)).unwrap_err();
        match err {
            RescaleError::MissingAnnotation { expected, .. } => {
                assert_eq!(expected, dataset.labels.join("orphan.txt"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_short_annotation_line_aborts() {
        let dataset = Dataset::new();
        dataset.add("a.png", 8, 8, "a.txt", "Car 0 0 0 1 2 3 4 1 1 1 1 1 1 1\nCar 0 0\n");

        let err = run(&dataset.images, &dataset.labels, &config(4, 4)).unwrap_err();
        match err {
            RescaleError::TooFewFields { line, found, .. } => {
                assert_eq!(line, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_unreadable_image_aborts() {
        let dataset = Dataset::new();
        fs::write(dataset.images.join("broken.png"), b"not an image").unwrap();
        fs::write(dataset.labels.join("broken.txt"), CAR).unwrap();

        let err = run(&dataset.images, &dataset.labels, &config(4, 4)).unwrap_err();
        assert!(matches!(err, RescaleError::Image { .. }));
    }

    #[test]
    fn test_subdirectories_are_skipped() {
        let dataset = Dataset::new();
        dataset.add("a.png", 10, 10, "a.txt", CAR);
        fs::create_dir(dataset.images.join("nested")).unwrap();

        let stats = run(&dataset.images, &dataset.labels, &config(5, 5)).unwrap();
        assert_eq!(stats.images_resized, 1);
        assert_eq!(stats.skipped_entries, 1);
    }

    #[test]
    fn test_output_overlapping_input_is_refused() {
        let temp_dir = tempfile::tempdir().unwrap();
        let images = temp_dir.path().join("images");
        let labels = temp_dir.path().join("scaled_annotations");
        fs::create_dir(&images).unwrap();
        fs::create_dir(&labels).unwrap();
        write_image(&images.join("a.png"), 4, 4);
        fs::write(labels.join("a.txt"), CAR).unwrap();

        let err = run(&images, &labels, &config(2, 2)).unwrap_err();
        assert!(matches!(err, RescaleError::OutputOverlapsInput { .. }));
        assert!(labels.join("a.txt").is_file());
    }

    #[test]
    fn test_input_nested_inside_output_is_refused() {
        let temp_dir = tempfile::tempdir().unwrap();
        let images = temp_dir.path().join("images");
        let labels = temp_dir.path().join("scaled_annotations").join("labels");
        fs::create_dir(&images).unwrap();
        fs::create_dir_all(&labels).unwrap();
        write_image(&images.join("a.png"), 4, 4);
        fs::write(labels.join("a.txt"), CAR).unwrap();

        let err = run(&images, &labels, &config(2, 2)).unwrap_err();
        assert!(matches!(err, RescaleError::OutputOverlapsInput { .. }));
        assert_eq!(fs::read_to_string(labels.join("a.txt")).unwrap(), CAR);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_file_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dataset = Dataset::new();
        let image_name = OsStr::from_bytes(b"f\xff.png");
        let label_name = OsStr::from_bytes(b"f\xff.txt");
        write_image(&dataset.images.join(image_name), 10, 20);
        fs::write(dataset.labels.join(label_name), CAR).unwrap();

        run(&dataset.images, &dataset.labels, &config(5, 10)).unwrap();

        let dims = image::image_dimensions(dataset.scaled_images().join(image_name)).unwrap();
        assert_eq!(dims, (5, 10));
        let label = fs::read_to_string(dataset.scaled_annotations().join(label_name)).unwrap();
        assert_eq!(label, "Car 0 0 0 5.0 10.0 15.0 20.0 1 1 1 1 1 1 1\n");
    }

    #[test]
    fn test_custom_output_dir() {
        let dataset = Dataset::new();
        dataset.add("a.png", 10, 20, "a.txt", CAR);
        let out = dataset.root.join("out");
        fs::create_dir(&out).unwrap();

        let mut config = config(5, 10);
        config.output_dir = Some(out.clone());
        run(&dataset.images, &dataset.labels, &config).unwrap();

        assert!(out.join("scaled_images").join("a.png").is_file());
        assert!(out.join("scaled_annotations").join("a.txt").is_file());
        assert!(!dataset.scaled_images().exists());
    }
}
